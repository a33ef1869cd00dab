mod assets;
pub mod handler;
pub mod layout;
mod poster;
mod raster;
mod renderer;
mod service;
mod text;
mod types;

pub use assets::CoverAssets;
pub use handler::create_cover_router;
pub use layout::{MetaBlockLayout, MetaRowLayout, PixelRect, Size};
pub use poster::{PosterFetcher, PosterImage, resolve as resolve_poster};
pub use renderer::{CoverLayout, CoverRenderer, CoverText, RenderedCover};
pub use service::{CoverService, RenderRequest};
pub use text::{GlyphMetrics, TextEngine};
pub use types::RenderCoverRequest;
