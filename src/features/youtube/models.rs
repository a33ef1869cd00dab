use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::duration::ceil_hours;
use super::url::YouTubeLink;

/// 年份未知时的显示文字
pub const UNKNOWN_YEAR: &str = "Неизвестно";

// =============== YouTube Data API v3 响应（只取用到的字段） ===============

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub maxres: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// 清晰度优先级：maxres > standard > high > medium > default
    pub fn best_url(&self) -> Option<&str> {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .map(|t| t.url.as_str())
        .find(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResource {
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

// =============== 领域模型 ===============

/// 链接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourseKind {
    Video,
    Playlist,
}

/// 播放列表中的单个视频
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideo {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub duration_seconds: u64,
}

/// 课程（视频或播放列表）元信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseMetadata {
    pub kind: CourseKind,
    pub title: String,
    pub description: String,
    /// 发布年份；播放列表取最晚一个视频的年份，空列表为 None
    pub year: Option<i32>,
    pub total_hours: u64,
    pub thumbnail_url: Option<String>,
    pub link: YouTubeLink,
    /// 仅播放列表有值，按列表顺序
    pub videos: Vec<PlaylistVideo>,
}

impl CourseMetadata {
    pub fn year_text(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string())
    }

    pub fn duration_text(&self) -> String {
        format!("{} часов", self.total_hours)
    }
}

/// 分页累加播放列表：总时长、最晚发布时间、首个视频的封面。
#[derive(Debug, Default)]
pub struct PlaylistAccumulator {
    videos: Vec<PlaylistVideo>,
    total_seconds: u64,
    latest: Option<DateTime<Utc>>,
    cover_url: Option<String>,
}

impl PlaylistAccumulator {
    pub fn push(&mut self, video: PlaylistVideo, thumbnails: Option<&Thumbnails>) {
        self.total_seconds += video.duration_seconds;
        if self.latest.is_none_or(|l| video.published_at > l) {
            self.latest = Some(video.published_at);
        }
        if self.cover_url.is_none() {
            self.cover_url = thumbnails.and_then(Thumbnails::best_url).map(str::to_string);
        }
        self.videos.push(video);
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn finish(self, link: YouTubeLink, snippet: PlaylistSnippet) -> CourseMetadata {
        CourseMetadata {
            kind: CourseKind::Playlist,
            title: snippet.title,
            description: snippet.description,
            year: self.latest.map(|d| d.year()),
            total_hours: ceil_hours(self.total_seconds),
            thumbnail_url: self.cover_url,
            link,
            videos: self.videos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn thumb(url: &str) -> Option<Thumbnail> {
        Some(Thumbnail {
            url: url.to_string(),
        })
    }

    #[test]
    fn best_thumbnail_prefers_highest_quality() {
        let t = Thumbnails {
            high: thumb("high"),
            medium: thumb("medium"),
            default: thumb("default"),
            ..Default::default()
        };
        assert_eq!(t.best_url(), Some("high"));

        let t = Thumbnails {
            maxres: thumb("maxres"),
            standard: thumb("standard"),
            ..Default::default()
        };
        assert_eq!(t.best_url(), Some("maxres"));
        assert_eq!(Thumbnails::default().best_url(), None);
    }

    #[test]
    fn accumulator_tracks_latest_year_and_first_cover() {
        let mut acc = PlaylistAccumulator::default();
        let first_thumbs = Thumbnails {
            medium: thumb("first"),
            ..Default::default()
        };
        let second_thumbs = Thumbnails {
            maxres: thumb("second"),
            ..Default::default()
        };
        acc.push(
            PlaylistVideo {
                title: "Урок 1".to_string(),
                published_at: Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
                duration_seconds: 3000,
            },
            Some(&first_thumbs),
        );
        acc.push(
            PlaylistVideo {
                title: "Урок 2".to_string(),
                published_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
                duration_seconds: 1000,
            },
            Some(&second_thumbs),
        );

        let meta = acc.finish(
            YouTubeLink::Playlist {
                id: "PL1".to_string(),
            },
            PlaylistSnippet {
                title: "Курс".to_string(),
                description: String::new(),
            },
        );
        assert_eq!(meta.year, Some(2023));
        assert_eq!(meta.total_hours, 2);
        assert_eq!(meta.thumbnail_url.as_deref(), Some("first"));
        assert_eq!(meta.year_text(), "2023");
        assert_eq!(meta.duration_text(), "2 часов");
        assert_eq!(meta.videos.len(), 2);
    }

    #[test]
    fn empty_playlist_has_unknown_year() {
        let meta = PlaylistAccumulator::default().finish(
            YouTubeLink::Playlist {
                id: "PL1".to_string(),
            },
            PlaylistSnippet {
                title: "Пусто".to_string(),
                description: String::new(),
            },
        );
        assert_eq!(meta.year_text(), UNKNOWN_YEAR);
        assert_eq!(meta.duration_text(), "0 часов");
        assert!(meta.thumbnail_url.is_none());
    }
}
