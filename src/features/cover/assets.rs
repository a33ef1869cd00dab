use std::path::Path;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use resvg::usvg::fontdb;
use tiny_skia::Pixmap;

use crate::config::CoverConfig;
use crate::error::AppError;

use super::layout::Size;
use super::raster::{pixmap_size, rgb_to_pixmap, rgba_to_pixmap};

/// 封面合成用到的全部静态资源（加载后只读，跨渲染共享）。
pub struct CoverAssets {
    background: Pixmap,
    calendar_icon: Pixmap,
    clock_icon: Pixmap,
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl CoverAssets {
    /// 按配置路径加载背景、图标与字体。任一缺失或无法解码都返回 `AssetMissing`。
    pub fn load(cfg: &CoverConfig) -> Result<Self, AppError> {
        let t0 = std::time::Instant::now();

        let background = load_image(&cfg.background_path)?.to_rgb8();
        let background = rgb_to_pixmap(&background)?;

        let calendar_icon = load_icon(&cfg.calendar_icon_path, cfg.icon_size)?;
        let clock_icon = load_icon(&cfg.clock_icon_path, cfg.icon_size)?;

        let (fontdb, font_family) = load_font(&cfg.font_path)?;

        tracing::info!(
            target: "cover_performance",
            "封面资源加载完成: 背景 {}x{}, 字体族 '{}', 耗时 {}ms",
            background.width(),
            background.height(),
            font_family,
            t0.elapsed().as_millis()
        );

        Ok(Self {
            background,
            calendar_icon,
            clock_icon,
            fontdb: Arc::new(fontdb),
            font_family,
        })
    }

    pub fn canvas_size(&self) -> Size {
        pixmap_size(&self.background)
    }

    /// 每次渲染复制一份背景作为新画布，模板本身不被修改。
    pub fn fresh_canvas(&self) -> Pixmap {
        self.background.clone()
    }

    pub fn calendar_icon(&self) -> &Pixmap {
        &self.calendar_icon
    }

    pub fn clock_icon(&self) -> &Pixmap {
        &self.clock_icon
    }

    pub fn fontdb(&self) -> Arc<fontdb::Database> {
        self.fontdb.clone()
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

fn load_image(path: &str) -> Result<image::DynamicImage, AppError> {
    image::open(path).map_err(|e| AppError::AssetMissing(format!("{path}: {e}")))
}

/// 图标统一缩放为 `size × size`，保留 alpha 供合成时做蒙版。
fn load_icon(path: &str, size: u32) -> Result<Pixmap, AppError> {
    let rgba = load_image(path)?.to_rgba8();
    let rgba = if rgba.dimensions() == (size, size) {
        rgba
    } else {
        imageops::resize(&rgba, size, size, FilterType::Lanczos3)
    };
    rgba_to_pixmap(&rgba)
}

/// 只加载配置指定的字体文件（不扫描系统字体），并把它设为默认无衬线族。
fn load_font(path: &str) -> Result<(fontdb::Database, String), AppError> {
    if !Path::new(path).is_file() {
        return Err(AppError::AssetMissing(format!("{path}: 字体文件不存在")));
    }

    let mut db = fontdb::Database::new();
    db.load_font_file(path)
        .map_err(|e| AppError::AssetMissing(format!("{path}: {e}")))?;

    let family = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
        .ok_or_else(|| AppError::AssetMissing(format!("{path}: 无法解析字体")))?;
    db.set_sans_serif_family(family.clone());

    Ok((db, family))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_assets_load() {
        let assets = CoverAssets::load(&CoverConfig::default()).expect("load bundled assets");
        assert_eq!(assets.canvas_size(), Size::new(1280, 720));
        assert_eq!(pixmap_size(assets.calendar_icon()), Size::new(48, 48));
        assert_eq!(pixmap_size(assets.clock_icon()), Size::new(48, 48));
        assert!(!assets.font_family().is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let cfg = CoverConfig {
            clock_icon_path: "./resources/img/does-not-exist.png".to_string(),
            ..CoverConfig::default()
        };
        match CoverAssets::load(&cfg) {
            Err(AppError::AssetMissing(msg)) => assert!(msg.contains("does-not-exist.png")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected AssetMissing"),
        }
    }

    #[test]
    fn non_font_file_is_rejected() {
        match load_font("./resources/img/background.png") {
            Err(AppError::AssetMissing(_)) => {}
            other => panic!("expected AssetMissing, got ok={}", other.is_ok()),
        }
    }
}
