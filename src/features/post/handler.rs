use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};

use crate::{error::AppError, state::AppState};

use super::models::{CreatePostRequest, PostResponse, ReviseTitleRequest};

#[utoipa::path(
    post,
    path = "/posts",
    summary = "根据 YouTube 链接生成帖子",
    description = "解析视频/播放列表链接，拉取元信息，生成文案并渲染封面。返回的 postId 可用于确认或修改一次标题。",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "帖子", body = PostResponse),
        (status = 404, description = "视频或播放列表不存在", body = crate::error::ProblemDetails, content_type = "application/problem+json"),
        (status = 422, description = "链接格式错误", body = crate::error::ProblemDetails, content_type = "application/problem+json"),
        (status = 502, description = "上游调用失败", body = crate::error::ProblemDetails, content_type = "application/problem+json"),
        (status = 503, description = "缺少 API Key", body = crate::error::ProblemDetails, content_type = "application/problem+json")
    ),
    tag = "Post"
)]
pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(state.posts.create_post(&req.url).await?))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/approve",
    summary = "确认帖子",
    params(("id" = String, Path, description = "帖子 ID")),
    responses(
        (status = 204, description = "已确认"),
        (status = 404, description = "帖子不存在或已过期", body = crate::error::ProblemDetails, content_type = "application/problem+json")
    ),
    tag = "Post"
)]
pub async fn approve_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.posts.approve(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/posts/{id}/title",
    summary = "修改帖子标题（仅一次）",
    description = "提交两行文本：第一行标题，第二行副标题。重新渲染封面后该帖子不再可修改。",
    params(("id" = String, Path, description = "帖子 ID")),
    request_body = ReviseTitleRequest,
    responses(
        (status = 200, description = "修改后的帖子", body = PostResponse),
        (status = 404, description = "帖子不存在或已过期", body = crate::error::ProblemDetails, content_type = "application/problem+json"),
        (status = 422, description = "不是两行文本", body = crate::error::ProblemDetails, content_type = "application/problem+json")
    ),
    tag = "Post"
)]
pub async fn revise_title(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviseTitleRequest>,
) -> Result<Json<PostResponse>, AppError> {
    Ok(Json(state.posts.revise_title(&id, &req.text).await?))
}

pub fn create_post_router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id/approve", post(approve_post))
        .route("/posts/:id/title", post(revise_title))
}
