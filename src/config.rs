use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 日志格式
    pub format: String,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    pub prefix: String,
}

/// 封面合成配置：资源路径与全部排版常量。
///
/// 渲染器只接收这份配置（`CoverRenderer::new`），不会回头读取全局单例。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverConfig {
    /// 背景模板（固定尺寸，RGB）
    #[serde(default = "CoverConfig::default_background_path")]
    pub background_path: String,
    /// 文字字体文件（ttf/otf）
    #[serde(default = "CoverConfig::default_font_path")]
    pub font_path: String,
    /// 年份行图标
    #[serde(default = "CoverConfig::default_calendar_icon_path")]
    pub calendar_icon_path: String,
    /// 时长行图标
    #[serde(default = "CoverConfig::default_clock_icon_path")]
    pub clock_icon_path: String,
    /// 文字颜色（SVG 颜色字面量）
    #[serde(default = "CoverConfig::default_text_color")]
    pub text_color: String,

    /// 标题字号
    #[serde(default = "CoverConfig::default_title_font_size")]
    pub title_font_size: f32,
    /// 副标题字号
    #[serde(default = "CoverConfig::default_subtitle_font_size")]
    pub subtitle_font_size: f32,
    /// 元信息（年份/时长）字号
    #[serde(default = "CoverConfig::default_meta_font_size")]
    pub meta_font_size: f32,
    /// 标题左上角 x
    #[serde(default = "CoverConfig::default_margin")]
    pub title_x: i32,
    /// 标题左上角 y
    #[serde(default = "CoverConfig::default_margin")]
    pub title_y: i32,
    /// 标题底边到副标题顶边的间距
    #[serde(default = "CoverConfig::default_subtitle_gap")]
    pub subtitle_gap: i32,

    /// 海报缩放后的固定高度
    #[serde(default = "CoverConfig::default_poster_target_height")]
    pub poster_target_height: u32,
    /// 海报距画布右边/下边的距离
    #[serde(default = "CoverConfig::default_margin")]
    pub poster_margin: i32,
    /// 海报拉取超时（秒）
    #[serde(default = "CoverConfig::default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,
    /// 海报下载体积上限（字节）
    #[serde(default = "CoverConfig::default_poster_max_bytes")]
    pub poster_max_bytes: u64,
    /// 占位海报宽度
    #[serde(default = "CoverConfig::default_placeholder_width")]
    pub placeholder_width: u32,
    /// 占位海报高度
    #[serde(default = "CoverConfig::default_placeholder_height")]
    pub placeholder_height: u32,
    /// 占位海报颜色（RGBA）
    #[serde(default = "CoverConfig::default_placeholder_rgba")]
    pub placeholder_rgba: [u8; 4],

    /// 图标边长（正方形）
    #[serde(default = "CoverConfig::default_icon_size")]
    pub icon_size: u32,
    /// 图标与文字的水平间距
    #[serde(default = "CoverConfig::default_row_gap")]
    pub icon_text_gap: i32,
    /// 两行元信息之间的垂直间距
    #[serde(default = "CoverConfig::default_row_gap")]
    pub row_gap: i32,
    /// 元信息块左边距
    #[serde(default = "CoverConfig::default_margin")]
    pub meta_left: i32,

    /// 标题为空时由调用方替换的占位文字
    #[serde(default = "CoverConfig::default_placeholder_title")]
    pub placeholder_title: String,
}

impl CoverConfig {
    fn default_background_path() -> String {
        "./resources/img/background.png".to_string()
    }
    fn default_font_path() -> String {
        "./resources/fonts/DejaVuSansCondensed.ttf".to_string()
    }
    fn default_calendar_icon_path() -> String {
        "./resources/img/calendar.png".to_string()
    }
    fn default_clock_icon_path() -> String {
        "./resources/img/clock.png".to_string()
    }
    fn default_text_color() -> String {
        "#FFFFFF".to_string()
    }
    fn default_title_font_size() -> f32 {
        60.0
    }
    fn default_subtitle_font_size() -> f32 {
        34.0
    }
    fn default_meta_font_size() -> f32 {
        48.0
    }
    fn default_margin() -> i32 {
        60
    }
    fn default_subtitle_gap() -> i32 {
        5
    }
    fn default_poster_target_height() -> u32 {
        330
    }
    fn default_poster_timeout_secs() -> u64 {
        10
    }
    fn default_poster_max_bytes() -> u64 {
        20 * 1024 * 1024
    }
    fn default_placeholder_width() -> u32 {
        1200
    }
    fn default_placeholder_height() -> u32 {
        900
    }
    fn default_placeholder_rgba() -> [u8; 4] {
        [255, 0, 0, 255]
    }
    fn default_icon_size() -> u32 {
        48
    }
    fn default_row_gap() -> i32 {
        10
    }
    fn default_placeholder_title() -> String {
        "Без названия".to_string()
    }

    /// 标题为空白时替换为占位文字。
    pub fn title_or_placeholder(&self, title: &str) -> String {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            self.placeholder_title.clone()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            background_path: Self::default_background_path(),
            font_path: Self::default_font_path(),
            calendar_icon_path: Self::default_calendar_icon_path(),
            clock_icon_path: Self::default_clock_icon_path(),
            text_color: Self::default_text_color(),
            title_font_size: Self::default_title_font_size(),
            subtitle_font_size: Self::default_subtitle_font_size(),
            meta_font_size: Self::default_meta_font_size(),
            title_x: Self::default_margin(),
            title_y: Self::default_margin(),
            subtitle_gap: Self::default_subtitle_gap(),
            poster_target_height: Self::default_poster_target_height(),
            poster_margin: Self::default_margin(),
            poster_timeout_secs: Self::default_poster_timeout_secs(),
            poster_max_bytes: Self::default_poster_max_bytes(),
            placeholder_width: Self::default_placeholder_width(),
            placeholder_height: Self::default_placeholder_height(),
            placeholder_rgba: Self::default_placeholder_rgba(),
            icon_size: Self::default_icon_size(),
            icon_text_gap: Self::default_row_gap(),
            row_gap: Self::default_row_gap(),
            meta_left: Self::default_margin(),
            placeholder_title: Self::default_placeholder_title(),
        }
    }
}

/// 图片渲染配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageRenderConfig {
    /// 并发渲染许可数（0=自动，取 CPU 核心数）
    #[serde(default)]
    pub max_parallel: u32,
}

impl ImageRenderConfig {
    /// 实际生效的渲染许可数
    pub fn effective_parallelism(&self) -> usize {
        let m = self.max_parallel as usize;
        if m == 0 { num_cpus::get() } else { m }
    }
}

/// YouTube Data API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API Key（缺省读取环境变量 YOUTUBE_API_KEY）
    #[serde(default = "YouTubeConfig::default_api_key")]
    pub api_key: Option<String>,
    /// API 基地址
    #[serde(default = "YouTubeConfig::default_base_url")]
    pub base_url: String,
    /// 播放列表分页大小（上游上限 50）
    #[serde(default = "YouTubeConfig::default_page_size")]
    pub page_size: u32,
}

impl YouTubeConfig {
    fn default_api_key() -> Option<String> {
        non_empty_env("YOUTUBE_API_KEY")
    }
    fn default_base_url() -> String {
        "https://www.googleapis.com/youtube/v3".to_string()
    }
    fn default_page_size() -> u32 {
        50
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: Self::default_api_key(),
            base_url: Self::default_base_url(),
            page_size: Self::default_page_size(),
        }
    }
}

/// 文案生成（OpenAI 兼容 Chat Completions）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API Key（缺省读取环境变量 CHATGPT_API_KEY）
    #[serde(default = "OpenAiConfig::default_api_key")]
    pub api_key: Option<String>,
    /// API 基地址
    #[serde(default = "OpenAiConfig::default_base_url")]
    pub base_url: String,
    /// 模型名
    #[serde(default = "OpenAiConfig::default_model")]
    pub model: String,
    /// 生成长度上限
    #[serde(default = "OpenAiConfig::default_max_tokens")]
    pub max_tokens: u32,
}

impl OpenAiConfig {
    fn default_api_key() -> Option<String> {
        non_empty_env("CHATGPT_API_KEY")
    }
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }
    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }
    fn default_max_tokens() -> u32 {
        3000
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: Self::default_api_key(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            max_tokens: Self::default_max_tokens(),
        }
    }
}

/// 待确认帖子（单轮标题修改）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    /// 待确认状态保留时间（秒）
    #[serde(default = "PostConfig::default_session_ttl")]
    pub session_ttl_secs: u64,
    /// 同时保留的待确认帖子上限
    #[serde(default = "PostConfig::default_max_sessions")]
    pub max_sessions: u64,
}

impl PostConfig {
    fn default_session_ttl() -> u64 {
        3600
    }
    fn default_max_sessions() -> u64 {
        10_000
    }
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: Self::default_session_ttl(),
            max_sessions: Self::default_max_sessions(),
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 优雅退出超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    /// 获取优雅退出超时时间
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    /// 封面合成配置
    #[serde(default)]
    pub cover: CoverConfig,
    /// 图片渲染配置
    #[serde(default)]
    pub image: ImageRenderConfig,
    /// YouTube 元信息配置
    #[serde(default)]
    pub youtube: YouTubeConfig,
    /// 文案生成配置
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// 待确认帖子配置
    #[serde(default)]
    pub post: PostConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// 配置文件可缺省；环境变量形如 `APP_SERVER__PORT=8080`、`APP_OPENAI__MODEL=gpt-4o`。
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();

        tracing::info!("正在从 {:?} 加载配置文件", config_path);

        let defaults = ConfigBuilder::try_from(&AppConfig::default())?;
        let builder = ConfigBuilder::builder()
            .add_source(defaults)
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = builder.try_deserialize()?;

        tracing::debug!(
            "配置加载完成: youtube_api_key = {}, openai_api_key = {}",
            config.youtube.api_key.is_some(),
            config.openai.api_key.is_some()
        );

        Ok(config)
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取配置文件路径
    fn get_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3939,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "full".to_string(),
            },
            api: ApiConfig {
                prefix: "/api/v1".to_string(),
            },
            cover: CoverConfig::default(),
            image: ImageRenderConfig::default(),
            youtube: YouTubeConfig::default(),
            openai: OpenAiConfig::default(),
            post: PostConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
