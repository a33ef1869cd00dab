use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use crate::config::CoverConfig;
use crate::error::AppError;

use super::poster::{self, PosterFetcher};
use super::renderer::{CoverRenderer, CoverText, RenderedCover};

/// 一次封面渲染的输入
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// 海报地址；缺失或空白视为调用方错误
    pub poster_source: Option<String>,
    pub title: String,
    pub year: String,
    pub duration: String,
    pub subtitle: Option<String>,
}

/// 封面服务：异步拉取海报，再在阻塞线程池里做像素合成。
#[derive(Clone)]
pub struct CoverService {
    renderer: Arc<CoverRenderer>,
    fetcher: PosterFetcher,
    semaphore: Arc<Semaphore>,
}

impl CoverService {
    pub fn new(config: CoverConfig, max_parallel: usize) -> Result<Self, AppError> {
        let fetcher = PosterFetcher::from_config(&config)
            .map_err(|e| AppError::Internal(format!("初始化海报下载 client 失败: {e}")))?;
        Ok(Self::with_fetcher(config, fetcher, max_parallel))
    }

    pub fn with_fetcher(config: CoverConfig, fetcher: PosterFetcher, max_parallel: usize) -> Self {
        Self {
            renderer: Arc::new(CoverRenderer::new(config)),
            fetcher,
            semaphore: Arc::new(Semaphore::new(max_parallel.max(1))),
        }
    }

    pub fn renderer(&self) -> &CoverRenderer {
        &self.renderer
    }

    /// 渲染封面并返回 PNG。
    ///
    /// 海报地址缺失在任何网络请求之前就返回 `InvalidInput`；
    /// 海报下载或解码失败则换成占位图继续渲染。
    pub async fn render_cover(&self, req: RenderRequest) -> Result<RenderedCover, AppError> {
        let url = req
            .poster_source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::InvalidInput("未提供海报地址".to_string()))?
            .to_string();

        let t_fetch = Instant::now();
        let fetched = self.fetcher.fetch_bytes(&url).await;
        tracing::info!(
            target: "cover_performance",
            "海报下载结束: ok={}, 耗时 {}ms",
            fetched.is_ok(),
            t_fetch.elapsed().as_millis()
        );

        let t_wait = Instant::now();
        let _permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(format!("获取渲染信号量失败: {e}")))?;
        tracing::debug!(
            target: "cover_performance",
            "信号量获取完成，剩余许可: {}, 等待 {}ms",
            self.semaphore.available_permits(),
            t_wait.elapsed().as_millis()
        );

        let renderer = self.renderer.clone();
        let text = CoverText {
            title: renderer.config().title_or_placeholder(&req.title),
            subtitle: req.subtitle,
            year: req.year,
            duration: req.duration,
        };

        // 解码、缩放、绘制、编码都是阻塞的 CPU 计算，必须移出 tokio worker。
        tokio::task::spawn_blocking(move || {
            let poster = poster::resolve(&url, fetched, renderer.config());
            renderer.render(&poster, &text)
        })
        .await
        .map_err(|e| AppError::Internal(format!("阻塞渲染任务执行失败: {e}")))?
    }
}
