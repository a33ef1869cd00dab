use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::post,
};

use crate::{error::AppError, state::AppState};

use super::types::RenderCoverRequest;

/// 响应头：海报是否被占位图替换
pub const POSTER_PLACEHOLDER_HEADER: &str = "x-poster-placeholder";

#[utoipa::path(
    post,
    path = "/cover",
    summary = "生成课程封面",
    description = "下载海报并与标题、副标题、年份、时长一起合成到固定背景上，返回 PNG。海报不可用时以红色占位图代替，不视为失败。",
    request_body = RenderCoverRequest,
    responses(
        (status = 200, description = "PNG bytes of the cover", content_type = "image/png"),
        (status = 422, description = "未提供海报地址", body = crate::error::ProblemDetails, content_type = "application/problem+json"),
        (status = 500, description = "内置资源缺失", body = crate::error::ProblemDetails, content_type = "application/problem+json")
    ),
    tag = "Cover"
)]
pub async fn render_cover(
    State(state): State<AppState>,
    Json(req): Json<RenderCoverRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rendered = state.cover.render_cover(req.into()).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(
        POSTER_PLACEHOLDER_HEADER,
        HeaderValue::from_static(if rendered.layout.poster_placeholder {
            "true"
        } else {
            "false"
        }),
    );
    Ok((StatusCode::OK, headers, Bytes::from(rendered.png)))
}

pub fn create_cover_router() -> Router<AppState> {
    Router::new().route("/cover", post(render_cover))
}
