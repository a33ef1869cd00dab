use course_post_backend::startup::run_startup_checks;
use course_post_backend::state::AppState;
use course_post_backend::{ShutdownManager, build_router, config::AppConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_post_backend=info,tower_http=info".into()),
        )
        .init();

    let shutdown_manager = ShutdownManager::new();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    // Shared state
    let app_state = match AppState::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("应用状态初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    run_startup_checks(config, &app_state.cover).await;

    let app = build_router(app_state, &config.api.prefix);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("Cover API: http://{}{}/cover", addr, config.api.prefix);
    tracing::info!("Post API: http://{}{}/posts", addr, config.api.prefix);

    // 收到信号后停止接收新连接，在途请求最多再等 shutdown.timeout_secs
    let shutdown_timeout = config.shutdown.timeout_duration();
    let drain_manager = shutdown_manager.clone();
    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = shutdown_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
    });

    let server = tokio::spawn(async move { graceful.await });
    let drained = async {
        drain_manager.wait_for_shutdown().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        res = server => match res {
            Ok(Ok(())) => tracing::info!("服务器已优雅关闭"),
            Ok(Err(e)) => {
                tracing::error!("服务器运行错误: {}", e);
                std::process::exit(1);
            }
            Err(e) => {
                tracing::error!("服务器任务异常退出: {}", e);
                std::process::exit(1);
            }
        },
        _ = drained => {
            tracing::warn!("优雅退出超时（{}秒），强制退出", config.shutdown.timeout_secs);
        }
    }
}
