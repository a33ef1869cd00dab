use std::path::Path;

use crate::config::AppConfig;
use crate::features::cover::CoverService;

/// 执行启动检查
///
/// 1. 检查封面资源文件是否存在
/// 2. 预加载封面资源（失败只告警，首个渲染请求会再次尝试加载）
/// 3. 提示缺失的上游 API Key
pub async fn run_startup_checks(config: &AppConfig, cover: &CoverService) {
    tracing::info!("🔍 开始执行启动检查...");

    check_cover_files(config);

    let t_preload = std::time::Instant::now();
    let renderer_cover = cover.clone();
    match tokio::task::spawn_blocking(move || renderer_cover.renderer().assets().map(|_| ())).await
    {
        Ok(Ok(())) => tracing::info!(
            "✅ 封面资源预加载完成: {}ms",
            t_preload.elapsed().as_millis()
        ),
        Ok(Err(e)) => tracing::warn!("⚠️ 封面资源预加载失败: {}", e),
        Err(e) => tracing::warn!("⚠️ 封面资源预加载任务失败: {}", e),
    }

    if config.youtube.api_key.is_none() {
        tracing::warn!("⚠️ 未配置 YOUTUBE_API_KEY，/posts 接口将返回 503");
    }
    if config.openai.api_key.is_none() {
        tracing::warn!("⚠️ 未配置 CHATGPT_API_KEY，/posts 接口将返回 503");
    }

    tracing::info!("✅ 启动检查完成");
}

fn check_cover_files(config: &AppConfig) {
    let c = &config.cover;
    for (label, path) in [
        ("背景模板", &c.background_path),
        ("字体", &c.font_path),
        ("日历图标", &c.calendar_icon_path),
        ("时钟图标", &c.clock_icon_path),
    ] {
        if Path::new(path).is_file() {
            tracing::info!("✅ {}: {}", label, path);
        } else {
            tracing::warn!("⚠️ 未找到{}: {}", label, path);
        }
    }
}
