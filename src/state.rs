use crate::config::AppConfig;
use crate::error::AppError;
use crate::features::caption::CaptionGenerator;
use crate::features::cover::CoverService;
use crate::features::post::{PostService, PostStore};
use crate::features::youtube::YouTubeClient;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 封面渲染（内含并发渲染信号量）
    pub cover: CoverService,
    /// 帖子生成与单轮标题修改
    pub posts: PostService,
}

impl AppState {
    /// 按配置组装全部服务；上游 API Key 缺失不阻止启动，调用时再报 `MissingCredentials`。
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let cover = CoverService::new(config.cover.clone(), config.image.effective_parallelism())?;
        let posts = PostService::new(
            YouTubeClient::new(&config.youtube)?,
            CaptionGenerator::new(&config.openai)?,
            cover.clone(),
            PostStore::new(&config.post),
        );
        Ok(Self { cover, posts })
    }
}
