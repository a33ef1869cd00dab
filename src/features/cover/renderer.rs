//! 封面合成管线：背景 → 海报 → 标题/副标题 → 元信息两行 → PNG。
//!
//! 整个管线是同步 CPU 计算，调用方负责把它放进阻塞线程池。

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::config::CoverConfig;
use crate::error::AppError;

use super::assets::CoverAssets;
use super::layout::{
    MetaBlockLayout, MetaBlockSpec, PixelRect, Size, metadata_block, poster_rect, subtitle_origin,
};
use super::poster::PosterImage;
use super::raster::{encode_png_rgb, rgba_to_pixmap};
use super::text::TextEngine;

/// 绘制到封面上的四段文字
#[derive(Debug, Clone, Default)]
pub struct CoverText {
    /// 标题（调用方保证非空，空标题应先替换为占位文字）
    pub title: String,
    pub subtitle: Option<String>,
    pub year: String,
    pub duration: String,
}

/// 实际绘制出的各元素矩形，便于检查与调试
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverLayout {
    pub canvas: Size,
    pub poster: PixelRect,
    /// 海报是否为占位图
    pub poster_placeholder: bool,
    pub title: PixelRect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<PixelRect>,
    pub meta: MetaBlockLayout,
}

/// 渲染结果：PNG 字节 + 尺寸 + 排版
#[derive(Debug, Clone)]
pub struct RenderedCover {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: CoverLayout,
}

pub struct CoverRenderer {
    config: CoverConfig,
    assets: OnceCell<Arc<CoverAssets>>,
}

impl CoverRenderer {
    pub fn new(config: CoverConfig) -> Self {
        Self {
            config,
            assets: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    /// 首次成功加载后缓存；加载失败不缓存，下次调用会重试读取。
    pub fn assets(&self) -> Result<Arc<CoverAssets>, AppError> {
        self.assets
            .get_or_try_init(|| CoverAssets::load(&self.config).map(Arc::new))
            .cloned()
    }

    pub fn assets_loaded(&self) -> bool {
        self.assets.get().is_some()
    }

    /// 合成并编码为 PNG。
    pub fn render(&self, poster: &PosterImage, text: &CoverText) -> Result<RenderedCover, AppError> {
        let t0 = Instant::now();
        let assets = self.assets()?;
        let (canvas, layout) = self.compose(&assets, poster, text)?;
        let t_compose = t0.elapsed();

        let png = encode_png_rgb(&canvas)?;
        tracing::info!(
            target: "cover_performance",
            "封面渲染完成: {}x{}, {} 字节, 合成 {}ms, 编码 {}ms",
            canvas.width(),
            canvas.height(),
            png.len(),
            t_compose.as_millis(),
            (t0.elapsed() - t_compose).as_millis()
        );

        Ok(RenderedCover {
            png,
            width: canvas.width(),
            height: canvas.height(),
            layout,
        })
    }

    /// 在新画布上按固定顺序绘制全部元素，返回画布与排版。
    pub fn compose(
        &self,
        assets: &CoverAssets,
        poster: &PosterImage,
        text: &CoverText,
    ) -> Result<(Pixmap, CoverLayout), AppError> {
        let cfg = &self.config;
        let mut canvas = assets.fresh_canvas();
        let canvas_size = assets.canvas_size();
        let engine = TextEngine::new(assets.fontdb(), assets.font_family(), cfg.text_color.as_str());

        // 海报
        let visible_width = (canvas_size.width as i32 - cfg.poster_margin).max(1) as u32;
        let resized = poster.resized_to_height(cfg.poster_target_height, visible_width);
        let poster_px = rgba_to_pixmap(&resized)?;
        let poster_at = poster_rect(
            canvas_size,
            Size::new(poster_px.width(), poster_px.height()),
            cfg.poster_margin,
        );
        paste(&mut canvas, &poster_px, poster_at.x, poster_at.y);

        // 标题与副标题
        let title = engine.shape(&text.title, cfg.title_font_size)?;
        let title_rect = engine.draw_top_left(&mut canvas, cfg.title_x, cfg.title_y, &title);

        // 全空白副标题视为没有；其余原样绘制
        let subtitle_rect = match text.subtitle.as_deref() {
            Some(sub) if !sub.trim().is_empty() => {
                let shaped = engine.shape(sub, cfg.subtitle_font_size)?;
                let (x, y) = subtitle_origin(&title_rect, cfg.subtitle_gap);
                Some(engine.draw_top_left(&mut canvas, x, y, &shaped))
            }
            _ => None,
        };

        // 元信息：年份、时长
        let year = engine.shape(&text.year, cfg.meta_font_size)?;
        let duration = engine.shape(&text.duration, cfg.meta_font_size)?;
        let spec = MetaBlockSpec {
            left: cfg.meta_left,
            icon: Size::new(cfg.icon_size, cfg.icon_size),
            icon_text_gap: cfg.icon_text_gap,
            row_gap: cfg.row_gap,
        };
        let meta = metadata_block(canvas_size.height, &spec, &[year.size(), duration.size()]);
        let icons = [assets.calendar_icon(), assets.clock_icon()];
        for ((row, icon), shaped) in meta.rows.iter().zip(icons).zip([&year, &duration]) {
            paste(&mut canvas, icon, row.icon.x, row.icon.y);
            engine.draw_top_left(&mut canvas, row.text.x, row.text.y, shaped);
        }

        tracing::debug!(
            "封面排版: 海报 {:?}, 标题 {:?}, 副标题 {:?}, 元信息块 top={} height={}",
            poster_at,
            title_rect,
            subtitle_rect,
            meta.top,
            meta.height
        );

        let layout = CoverLayout {
            canvas: canvas_size,
            poster: poster_at,
            poster_placeholder: poster.is_placeholder(),
            title: title_rect,
            subtitle: subtitle_rect,
            meta,
        };
        Ok((canvas, layout))
    }
}

/// 以源图自身 alpha 为蒙版做 source-over 粘贴，超出画布的部分被裁掉。
fn paste(canvas: &mut Pixmap, src: &Pixmap, x: i32, y: i32) {
    canvas.draw_pixmap(
        x,
        y,
        src.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn pixel(canvas: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = canvas.pixel(x, y).expect("pixel in bounds");
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    #[test]
    fn paste_respects_source_alpha() {
        let mut canvas = Pixmap::new(4, 1).expect("canvas");
        canvas.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));

        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        src.put_pixel(1, 0, image::Rgba([255, 0, 0, 0]));
        let src = rgba_to_pixmap(&src).expect("src");

        paste(&mut canvas, &src, 1, 0);
        assert_eq!(pixel(&canvas, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&canvas, 1, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 2, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn placeholder_poster_lands_bottom_right() {
        let renderer = CoverRenderer::new(CoverConfig::default());
        let assets = renderer.assets().expect("assets");
        let poster = PosterImage::placeholder(renderer.config());
        let text = CoverText {
            title: "Курс по SQL".to_string(),
            subtitle: None,
            year: "2022".to_string(),
            duration: "15 часов".to_string(),
        };

        let (canvas, layout) = renderer.compose(&assets, &poster, &text).expect("compose");
        assert_eq!(layout.poster, PixelRect::new(1280 - 60 - 440, 720 - 60 - 330, 440, 330));
        assert!(layout.poster_placeholder);
        assert!(layout.subtitle.is_none());
        assert_eq!(pixel(&canvas, 1000, 500), [255, 0, 0, 255]);
        assert_eq!(layout.meta.rows.len(), 2);
    }
}
