use reqwest::Url;

use crate::error::AppError;

/// 链接类型：播放列表或单个视频
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YouTubeLink {
    Playlist { id: String },
    Video { id: String },
}

impl YouTubeLink {
    /// 识别链接类型；同时带 `list` 与视频 id 时按播放列表处理。
    pub fn parse(input: &str) -> Result<Self, AppError> {
        if let Some(id) = extract_playlist_id(input) {
            return Ok(Self::Playlist { id });
        }
        if let Some(id) = extract_video_id(input) {
            return Ok(Self::Video { id });
        }
        Err(AppError::Validation("Некорректный формат ссылки".to_string()))
    }

    /// 去掉跟踪参数后的规范链接
    pub fn clean_url(&self) -> String {
        match self {
            Self::Playlist { id } => format!("https://www.youtube.com/playlist?list={id}"),
            Self::Video { id } => format!("https://youtu.be/{id}"),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Playlist { id } | Self::Video { id } => id,
        }
    }
}

fn parse_lenient(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Url::parse(input)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| Url::parse(&format!("https://{input}")).ok())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// `list` 查询参数
pub fn extract_playlist_id(input: &str) -> Option<String> {
    let url = parse_lenient(input)?;
    url.query_pairs()
        .find(|(k, _)| k == "list")
        .and_then(|(_, v)| non_empty(&v))
}

/// 支持 `youtu.be/<id>`、`youtube.com/watch?v=<id>`、`/shorts/<id>`、`/embed/<id>`、`/live/<id>`。
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = parse_lenient(input)?;
    let host = url.host_str()?.to_ascii_lowercase();

    if host == "youtu.be" || host.ends_with(".youtu.be") {
        return url
            .path_segments()
            .and_then(|mut segs| segs.next())
            .and_then(non_empty);
    }

    if host == "youtube.com" || host.ends_with(".youtube.com") {
        if let Some(v) = url.query_pairs().find(|(k, _)| k == "v") {
            return non_empty(&v.1);
        }
        let mut segs = url.path_segments()?;
        return match segs.next() {
            Some("shorts" | "embed" | "live" | "v") => segs.next().and_then(non_empty),
            _ => None,
        };
    }

    None
}
