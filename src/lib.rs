/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 启动检查模块
pub mod startup;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 优雅退出管理模块
pub mod shutdown;

/// HTTP Client 复用工具
pub mod http;

/// OpenAPI 文档
pub mod openapi;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use error::AppError;
pub use shutdown::{ShutdownManager, ShutdownReason};

use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{cover, health, post};
use crate::state::AppState;

fn compression_predicate() -> impl tower_http::compression::predicate::Predicate {
    use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};

    // PNG 封面本身已压缩，只压 JSON/文本。
    SizeAbove::default()
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE)
        .and(NotForContentType::const_new("application/octet-stream"))
}

/// 组装完整路由：`/health`、`{api_prefix}/*` 业务接口与 `/docs`。
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    let api_router = Router::<AppState>::new()
        .merge(cover::create_cover_router())
        .merge(post::create_post_router());

    Router::<AppState>::new()
        .route("/health", get(health::health_check))
        .nest(api_prefix, api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(CompressionLayer::new().compress_when(compression_predicate()))
}
