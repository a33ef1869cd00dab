use serde::{Deserialize, Serialize};

use crate::features::cover::CoverLayout;

/// 创建帖子请求体
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    /// YouTube 视频或播放列表链接
    #[schema(example = "https://www.youtube.com/playlist?list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG")]
    pub url: String,
}

/// 修改标题请求体：两行文本，第一行标题，第二行副标题
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviseTitleRequest {
    #[schema(example = "Курс по SQL\nОсновы баз данных")]
    pub text: String,
}

/// 待确认帖子：保存重新渲染封面所需的全部信息
#[derive(Debug, Clone)]
pub struct PendingPost {
    /// 模型生成的原始文案（未转 HTML）
    pub caption: String,
    pub poster_url: String,
    pub year_text: String,
    pub duration_text: String,
}

/// 帖子响应
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// 待确认帖子 ID（用于确认或修改标题）
    pub post_id: String,
    /// HTML 文案
    pub caption: String,
    /// 封面标题
    pub title: String,
    /// 封面副标题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub year_text: String,
    pub duration_text: String,
    pub poster_url: String,
    /// 封面 PNG（base64）
    pub cover_png: String,
    /// 封面排版
    pub layout: CoverLayout,
    /// 是否还能修改标题（修改只允许一次）
    pub revisable: bool,
}
