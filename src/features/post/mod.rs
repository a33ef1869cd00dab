pub mod handler;
pub mod models;
mod service;
mod session;

pub use handler::create_post_router;
pub use models::{CreatePostRequest, PendingPost, PostResponse, ReviseTitleRequest};
pub use service::PostService;
pub use session::PostStore;
