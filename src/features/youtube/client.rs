use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::YouTubeConfig;
use crate::error::AppError;
use crate::http;

use super::duration::{ceil_hours, parse_iso8601_duration};
use super::models::{
    CourseKind, CourseMetadata, ListResponse, PlaylistAccumulator, PlaylistItem, PlaylistResource,
    PlaylistVideo, VideoItem,
};
use super::url::YouTubeLink;

/// YouTube Data API v3 的最小封装：单次请求，不重试。
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl YouTubeClient {
    pub fn new(cfg: &YouTubeConfig) -> Result<Self, AppError> {
        let client = http::client_timeout_30s()?.clone();
        Ok(Self::with_client(client, cfg))
    }

    pub fn with_client(client: Client, cfg: &YouTubeConfig) -> Self {
        Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            page_size: cfg.page_size.clamp(1, 50),
        }
    }

    pub async fn fetch(&self, link: &YouTubeLink) -> Result<CourseMetadata, AppError> {
        match link {
            YouTubeLink::Video { id } => self.fetch_video(id).await,
            YouTubeLink::Playlist { id } => self.fetch_playlist(id).await,
        }
    }

    pub async fn fetch_video(&self, video_id: &str) -> Result<CourseMetadata, AppError> {
        let resp: ListResponse<VideoItem> = self
            .get_json("videos", &[("part", "contentDetails,snippet"), ("id", video_id)])
            .await?;
        let item = resp
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Видео не найдено: {video_id}")))?;

        let seconds = parse_iso8601_duration(&item.content_details.duration);
        let thumbnail_url = item.snippet.thumbnails.best_url().map(str::to_string);
        tracing::debug!("视频元信息: id={}, 时长 {}s", video_id, seconds);

        Ok(CourseMetadata {
            kind: CourseKind::Video,
            title: item.snippet.title,
            description: item.snippet.description,
            year: Some(chrono::Datelike::year(&item.snippet.published_at)),
            total_hours: ceil_hours(seconds),
            thumbnail_url,
            link: YouTubeLink::Video {
                id: video_id.to_string(),
            },
            videos: Vec::new(),
        })
    }

    /// 播放列表：逐页读取 `playlistItems`，每页再批量查一次 `videos` 取时长与封面。
    pub async fn fetch_playlist(&self, playlist_id: &str) -> Result<CourseMetadata, AppError> {
        let resp: ListResponse<PlaylistResource> = self
            .get_json("playlists", &[("part", "snippet"), ("id", playlist_id)])
            .await?;
        let playlist = resp
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Плейлист не найден: {playlist_id}")))?;

        let page_size = self.page_size.to_string();
        let mut acc = PlaylistAccumulator::default();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let mut query = vec![
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: ListResponse<PlaylistItem> = self.get_json("playlistItems", &query).await?;
            pages += 1;

            let ids: Vec<&str> = page
                .items
                .iter()
                .filter_map(|i| i.snippet.resource_id.video_id.as_deref())
                .collect();
            let details = self.video_details(&ids).await?;

            for item in &page.items {
                let Some(detail) = item
                    .snippet
                    .resource_id
                    .video_id
                    .as_deref()
                    .and_then(|id| details.get(id))
                else {
                    // 私有/已删除视频没有详情
                    tracing::debug!("跳过无详情的播放列表条目: {}", item.snippet.title);
                    continue;
                };
                acc.push(
                    PlaylistVideo {
                        title: item.snippet.title.clone(),
                        published_at: item.snippet.published_at,
                        duration_seconds: parse_iso8601_duration(&detail.content_details.duration),
                    },
                    Some(&detail.snippet.thumbnails),
                );
            }

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        tracing::info!(
            "播放列表元信息: id={}, 视频 {} 个, 分页 {} 次",
            playlist_id,
            acc.len(),
            pages
        );
        Ok(acc.finish(
            YouTubeLink::Playlist {
                id: playlist_id.to_string(),
            },
            playlist.snippet,
        ))
    }

    async fn video_details(&self, ids: &[&str]) -> Result<HashMap<String, VideoItem>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids.join(",");
        let resp: ListResponse<VideoItem> = self
            .get_json("videos", &[("part", "contentDetails,snippet"), ("id", joined.as_str())])
            .await?;
        Ok(resp.items.into_iter().map(|v| (v.id.clone(), v)).collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingCredentials("未配置 YouTube API Key".to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", key)])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("YouTube {endpoint}: 404")));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("YouTube API {} 返回 {}: {}", endpoint, status, body);
            return Err(AppError::Network(format!("YouTube {endpoint} 返回 {status}")));
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
