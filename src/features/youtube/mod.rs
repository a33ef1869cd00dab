mod client;
pub mod duration;
pub mod models;
pub mod url;

pub use client::YouTubeClient;
pub use models::{CourseKind, CourseMetadata, PlaylistVideo, UNKNOWN_YEAR};
pub use url::{YouTubeLink, extract_playlist_id, extract_video_id};
