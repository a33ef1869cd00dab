use utoipa::OpenApi;
use utoipa::openapi::server::{ServerBuilder, ServerVariableBuilder};
use utoipa::Modify;

/// 为 Swagger UI 提供“业务接口前缀”Servers 配置。
///
/// 业务接口挂在 `config.api.prefix`（默认 `/api/v1`）下，`/health` 不带前缀，
/// 因此额外提供 `/` 作为备用 server。
struct ApiServers;

impl Modify for ApiServers {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let api = ServerBuilder::new()
            .url("{api_prefix}")
            .description(Some("业务接口（默认 /api/v1）"))
            .parameter(
                "api_prefix",
                ServerVariableBuilder::new()
                    .default_value("/api/v1")
                    .description(Some(
                        "业务接口前缀：对应 config.api.prefix（可通过 APP_API__PREFIX 覆盖）",
                    )),
            )
            .build();

        let root = ServerBuilder::new()
            .url("/")
            .description(Some("根路径（/health）"))
            .build();

        openapi.servers = Some(vec![api, root]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::health_check,
        crate::features::cover::handler::render_cover,
        crate::features::post::handler::create_post,
        crate::features::post::handler::approve_post,
        crate::features::post::handler::revise_title,
    ),
    components(schemas(
        crate::error::ProblemDetails,
        crate::features::health::HealthResponse,
        crate::features::cover::RenderCoverRequest,
        crate::features::cover::CoverLayout,
        crate::features::cover::MetaBlockLayout,
        crate::features::cover::MetaRowLayout,
        crate::features::cover::PixelRect,
        crate::features::cover::Size,
        crate::features::post::CreatePostRequest,
        crate::features::post::ReviseTitleRequest,
        crate::features::post::PostResponse,
    )),
    modifiers(&ApiServers),
    tags(
        (name = "Cover", description = "封面合成：海报 + 标题 + 年份/时长，输出 PNG。"),
        (name = "Post", description = "帖子：YouTube 链接 → 文案 + 封面，支持一次标题修改。"),
        (name = "Health", description = "健康检查：服务探活。"),
    ),
    info(
        title = "Course Post API",
        version = env!("CARGO_PKG_VERSION"),
        description = "YouTube 课程帖子生成服务（Axum + utoipa）。除 /health 外，业务接口挂载在 `config.api.prefix`（默认 /api/v1）下，OpenAPI 的 paths 不包含该前缀。"
    )
)]
pub struct ApiDoc;
