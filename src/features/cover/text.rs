use std::fmt::Write;
use std::sync::Arc;

use resvg::usvg::{self, Options as UsvgOptions, fontdb};
use tiny_skia::{Pixmap, Rect, Transform};

use crate::error::AppError;

use super::layout::{PixelRect, Size};

/// 文字在锚点坐标系下的紧致包围盒（按字形轮廓计算，已取整到像素）。
///
/// `left/top` 即字形相对锚点的偏移（bearing），绘制时要反向补偿。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl GlyphMetrics {
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn from_rect(r: Rect) -> Self {
        Self {
            left: r.left().floor() as i32,
            top: r.top().floor() as i32,
            right: r.right().ceil() as i32,
            bottom: r.bottom().ceil() as i32,
        }
    }
}

/// 已排版的一段文字：解析好的矢量树 + 度量，先量后画，避免重复排版。
pub struct ShapedText {
    tree: Option<usvg::Tree>,
    metrics: GlyphMetrics,
}

impl ShapedText {
    pub fn metrics(&self) -> GlyphMetrics {
        self.metrics
    }

    pub fn size(&self) -> Size {
        self.metrics.size()
    }
}

/// 文字排版引擎：单一字体族 + 单一填充色。
pub struct TextEngine {
    fontdb: Arc<fontdb::Database>,
    family: String,
    fill: String,
}

impl TextEngine {
    pub fn new(fontdb: Arc<fontdb::Database>, family: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            fontdb,
            family: family.into(),
            fill: fill.into(),
        }
    }

    /// 排版并测量。空白文本得到零尺寸度量，绘制时什么都不画。
    pub fn shape(&self, text: &str, font_size: f32) -> Result<ShapedText, AppError> {
        if text.trim().is_empty() {
            return Ok(ShapedText {
                tree: None,
                metrics: GlyphMetrics::default(),
            });
        }

        let svg = self.text_svg(text, font_size)?;
        let opts = UsvgOptions {
            fontdb: self.fontdb.clone(),
            font_family: self.family.clone(),
            font_size,
            languages: vec!["ru".to_string(), "en".to_string()],
            text_rendering: usvg::TextRendering::GeometricPrecision,
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| AppError::ImageRendererError(format!("Failed to parse text SVG: {e}")))?;

        let Some(bounds) = text_bounds(tree.root()) else {
            tracing::warn!("文字未产生任何字形（字体缺字？）: {text:?}");
            return Ok(ShapedText {
                tree: None,
                metrics: GlyphMetrics::default(),
            });
        };

        Ok(ShapedText {
            tree: Some(tree),
            metrics: GlyphMetrics::from_rect(bounds),
        })
    }

    /// 仅测量
    pub fn measure(&self, text: &str, font_size: f32) -> Result<GlyphMetrics, AppError> {
        Ok(self.shape(text, font_size)?.metrics)
    }

    /// 把文字画到画布上，使可见字形的左上角恰好落在 (x, y)。
    ///
    /// 返回占位矩形 `(x, y, x + width, y + height)`，供后续排版串联。
    pub fn draw_top_left(&self, canvas: &mut Pixmap, x: i32, y: i32, shaped: &ShapedText) -> PixelRect {
        let m = shaped.metrics;
        if let Some(tree) = shaped.tree.as_ref() {
            let dx = (x - m.left) as f32;
            let dy = (y - m.top) as f32;
            resvg::render(tree, Transform::from_translate(dx, dy), &mut canvas.as_mut());
        }
        PixelRect::from_origin((x, y), m.size())
    }

    fn text_svg(&self, text: &str, font_size: f32) -> Result<String, AppError> {
        let fmt_err = |e: std::fmt::Error| AppError::ImageRendererError(format!("SVG formatting error: {e}"));
        let mut svg = String::with_capacity(256 + text.len());
        // 基线放在原点，字形上半部分落在负坐标，由度量补偿。
        // 空格原样保留，不做 SVG 默认的空白折叠。
        write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><text xml:space="preserve" x="0" y="0" font-family="'{}'" font-size="{}" fill="{}">{}</text></svg>"#,
            escape_xml(&self.family),
            font_size,
            escape_xml(&self.fill),
            escape_xml(text)
        )
        .map_err(fmt_err)?;
        Ok(svg)
    }
}

/// 递归收集文字节点的轮廓包围盒（flattened 之后的真实字形路径）。
fn text_bounds(group: &usvg::Group) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    for node in group.children() {
        let r = match node {
            usvg::Node::Text(text) => Some(text.flattened().bounding_box()),
            usvg::Node::Group(g) => text_bounds(g),
            _ => None,
        };
        if let Some(r) = r {
            acc = Some(match acc {
                None => r,
                Some(a) => Rect::from_ltrb(
                    a.left().min(r.left()),
                    a.top().min(r.top()),
                    a.right().max(r.right()),
                    a.bottom().max(r.bottom()),
                )
                .unwrap_or(a),
            });
        }
    }
    acc
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}
