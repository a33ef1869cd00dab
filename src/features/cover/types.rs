use serde::{Deserialize, Serialize};

use super::service::RenderRequest;

/// 封面渲染请求体
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderCoverRequest {
    /// 海报图片地址（必填，缺失返回 422）
    #[schema(example = "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")]
    #[serde(default)]
    pub poster_url: Option<String>,
    /// 标题（空白时使用占位标题）
    #[schema(example = "Курс по SQL")]
    #[serde(default)]
    pub title: String,
    /// 年份文字
    #[schema(example = "2022")]
    pub year: String,
    /// 时长文字
    #[schema(example = "15 часов")]
    pub duration: String,
    /// 副标题（可选）
    #[schema(example = "Основы баз данных")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl From<RenderCoverRequest> for RenderRequest {
    fn from(req: RenderCoverRequest) -> Self {
        Self {
            poster_source: req.poster_url,
            title: req.title,
            year: req.year,
            duration: req.duration,
            subtitle: req.subtitle,
        }
    }
}
