use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型
#[derive(Error, Debug, utoipa::ToSchema)]
pub enum AppError {
    /// 背景/字体/图标等内置资源缺失或无法解码（渲染无法继续）
    #[error("资源缺失: {0}")]
    AssetMissing(String),

    /// 调用方输入错误（如未提供海报地址）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 文案生成失败
    #[error("文案生成失败: {0}")]
    GenerationFailed(String),

    /// 缺少上游凭证（API Key 未配置）
    #[error("缺少凭证: {0}")]
    MissingCredentials(String),

    /// 上游不可达或返回非预期状态
    #[error("上游请求失败: {0}")]
    Network(String),

    /// 上游超时
    #[error("上游超时: {0}")]
    Timeout(String),

    /// 上游响应无法解析
    #[error("响应解析失败: {0}")]
    Json(String),

    #[error("未找到: {0}")]
    NotFound(String),

    /// 用户输入格式不对（链接、两行标题等）
    #[error("{0}")]
    Validation(String),

    /// 位图/矢量处理失败
    #[error("封面渲染失败: {0}")]
    ImageRendererError(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 海报拉取错误（非致命：由调用方替换为占位图，不向外传播）
#[derive(Error, Debug)]
pub enum PosterFetchError {
    #[error("连接失败: {0}")]
    Network(String),

    #[error("超时")]
    Timeout,

    #[error("上游返回状态码 {0}")]
    Status(u16),

    #[error("响应体超过 {0} 字节上限")]
    TooLarge(u64),

    #[error("图片解码失败: {0}")]
    Decode(String),
}

/// `application/problem+json` 错误体（RFC 7807）。
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// 固定为 about:blank
    #[serde(rename = "type")]
    #[schema(example = "about:blank")]
    pub type_url: String,
    /// HTTP 状态的短语
    #[schema(example = "Unprocessable Entity")]
    pub title: String,
    #[schema(example = 422)]
    pub status: u16,
    /// 错误描述（给人看的）
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "输入无效: 未提供海报地址")]
    pub detail: Option<String>,
    /// 稳定错误码（给程序判断用的）
    #[schema(example = "INVALID_INPUT")]
    pub code: String,
}

impl AppError {
    /// (HTTP 状态, 稳定错误码)
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Self::AssetMissing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ASSET_MISSING"),
            Self::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT"),
            Self::GenerationFailed(_) => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"),
            Self::MissingCredentials(_) => (StatusCode::SERVICE_UNAVAILABLE, "MISSING_CREDENTIALS"),
            Self::Network(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            Self::Json(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_BAD_RESPONSE"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            Self::ImageRendererError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IMAGE_RENDER_FAILED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.classify().0
    }

    /// 稳定错误码
    pub fn stable_code(&self) -> &'static str {
        self.classify().1
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!(code, "请求失败: {}", self);
        } else {
            tracing::debug!(code, "请求被拒绝: {}", self);
        }

        let body = ProblemDetails {
            type_url: "about:blank".to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            detail: Some(self.to_string()),
            code: code.to_string(),
        };

        let mut res = (status, Json(body)).into_response();
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        res
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::Json(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for PosterFetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return PosterFetchError::Timeout;
        }
        match err.status() {
            Some(status) => PosterFetchError::Status(status.as_u16()),
            None => PosterFetchError::Network(err.to_string()),
        }
    }
}

impl From<image::ImageError> for PosterFetchError {
    fn from(err: image::ImageError) -> Self {
        PosterFetchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_and_code() {
        let cases = [
            (AppError::AssetMissing("bg".into()), 500, "ASSET_MISSING"),
            (AppError::InvalidInput("poster".into()), 422, "INVALID_INPUT"),
            (AppError::GenerationFailed("x".into()), 502, "GENERATION_FAILED"),
            (AppError::MissingCredentials("k".into()), 503, "MISSING_CREDENTIALS"),
            (AppError::Timeout("t".into()), 504, "UPSTREAM_TIMEOUT"),
            (AppError::NotFound("p".into()), 404, "NOT_FOUND"),
            (AppError::Validation("v".into()), 422, "VALIDATION_FAILED"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status, "{err:?}");
            assert_eq!(err.stable_code(), code);
        }
    }

    #[test]
    fn validation_message_is_passed_through() {
        let e = AppError::Validation("Введите заголовок в две строчки.".into());
        assert_eq!(e.to_string(), "Введите заголовок в две строчки.");
    }

    #[tokio::test]
    async fn poster_status_errors_keep_the_code() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let app = axum::Router::new().route(
            "/poster.jpg",
            axum::routing::get(|| async { StatusCode::FORBIDDEN }),
        );
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let err = reqwest::get(format!("http://{addr}/poster.jpg"))
            .await
            .and_then(|r| r.error_for_status())
            .expect_err("403");
        let pf = PosterFetchError::from(err);
        assert!(matches!(pf, PosterFetchError::Status(403)), "{pf:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .expect("addr");
        let err = reqwest::get(format!("http://{addr}/")).await.expect_err("refused");
        assert!(matches!(PosterFetchError::from(err), PosterFetchError::Network(_)));
    }
}
