//! 封面排版的纯几何计算：海报缩放与锚定、标题/副标题堆叠、元信息块垂直居中。
//!
//! 这里不碰像素，只根据尺寸算矩形；渲染器拿着结果去绘制。

use serde::Serialize;

/// 宽高
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 整数像素矩形（左上角 + 宽高）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin(origin: (i32, i32), size: Size) -> Self {
        Self::new(origin.0, origin.1, size.width, size.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// 等比缩放到固定高度：`width = round(target_height × w / h)`，最小 1px。
pub fn scaled_poster_size(original: Size, target_height: u32) -> Size {
    let h = f64::from(original.height.max(1));
    let w = (f64::from(target_height) * f64::from(original.width) / h).round();
    Size::new((w as u32).max(1), target_height)
}

/// 海报实际参与缩放的源图区域与缩放后尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterFit {
    /// 源图裁剪起点 x（只裁左侧，右边缘始终保留）
    pub src_x: u32,
    pub src_width: u32,
    pub target: Size,
}

/// 缩放后宽度超过 `max_width` 时，只保留源图右侧可见的那一段。
///
/// 海报右对齐，左侧多出的部分反正会被画布裁掉；先裁再缩放，
/// 缓冲区大小就只取决于画布而不是源图宽高比。
pub fn fit_poster(original: Size, target_height: u32, max_width: u32) -> PosterFit {
    let scaled = scaled_poster_size(original, target_height);
    let max_width = max_width.max(1);
    if scaled.width <= max_width {
        return PosterFit {
            src_x: 0,
            src_width: original.width,
            target: scaled,
        };
    }
    let h = u64::from(original.height.max(1));
    let th = u64::from(target_height.max(1));
    let src_width = (u64::from(max_width) * h)
        .div_ceil(th)
        .clamp(1, u64::from(original.width.max(1))) as u32;
    PosterFit {
        src_x: original.width.saturating_sub(src_width),
        src_width,
        target: Size::new(max_width, target_height),
    }
}

/// 海报锚定在画布右下角，距右边与下边各 `margin`。
///
/// 海报比画布还宽时 x 可以为负，超出部分在绘制时被裁掉。
pub fn poster_rect(canvas: Size, poster: Size, margin: i32) -> PixelRect {
    let x = canvas.width as i32 - margin - poster.width as i32;
    let y = canvas.height as i32 - margin - poster.height as i32;
    PixelRect::from_origin((x, y), poster)
}

/// 副标题紧贴标题下方：左对齐标题，顶边 = 标题底边 + gap。
pub fn subtitle_origin(title: &PixelRect, gap: i32) -> (i32, i32) {
    (title.x, title.bottom() + gap)
}

/// 元信息块的固定参数
#[derive(Debug, Clone, Copy)]
pub struct MetaBlockSpec {
    /// 图标左边距
    pub left: i32,
    /// 图标尺寸
    pub icon: Size,
    /// 图标与文字的水平间距
    pub icon_text_gap: i32,
    /// 行间距
    pub row_gap: i32,
}

/// 单行（图标 + 文字）排版结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaRowLayout {
    /// 整行占位（高度 = max(图标高, 文字高)）
    pub row: PixelRect,
    pub icon: PixelRect,
    pub text: PixelRect,
}

/// 元信息块排版结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaBlockLayout {
    pub top: i32,
    pub height: u32,
    pub rows: Vec<MetaRowLayout>,
}

/// 计算元信息块：整体在画布上垂直居中，行内图标与文字各自在行高内垂直居中。
///
/// 所有"取一半"都按向下取整处理，与 `(a - b) / 2` 的整数语义一致。
pub fn metadata_block(canvas_height: u32, spec: &MetaBlockSpec, texts: &[Size]) -> MetaBlockLayout {
    let row_heights: Vec<u32> = texts
        .iter()
        .map(|t| t.height.max(spec.icon.height))
        .collect();
    let gaps = spec.row_gap * (row_heights.len().saturating_sub(1) as i32);
    let total = row_heights.iter().map(|h| *h as i32).sum::<i32>() + gaps;
    let top = (canvas_height as i32 - total).div_euclid(2);

    let text_x = spec.left + spec.icon.width as i32 + spec.icon_text_gap;
    let mut rows = Vec::with_capacity(texts.len());
    let mut row_top = top;
    for (text, row_h) in texts.iter().zip(&row_heights) {
        let row_h = *row_h;
        let icon_y = row_top + (row_h - spec.icon.height) as i32 / 2;
        let text_y = row_top + (row_h - text.height) as i32 / 2;
        let text_w = text.width;
        rows.push(MetaRowLayout {
            row: PixelRect::new(spec.left, row_top, (text_x - spec.left) as u32 + text_w, row_h),
            icon: PixelRect::from_origin((spec.left, icon_y), spec.icon),
            text: PixelRect::from_origin((text_x, text_y), *text),
        });
        row_top += row_h as i32 + spec.row_gap;
    }

    MetaBlockLayout {
        top,
        height: total.max(0) as u32,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> MetaBlockSpec {
        MetaBlockSpec {
            left: 60,
            icon: Size::new(48, 48),
            icon_text_gap: 10,
            row_gap: 10,
        }
    }

    #[test]
    fn poster_height_is_fixed_and_width_keeps_aspect() {
        for (w, h) in [(200, 100), (1280, 720), (480, 360), (1, 1000), (999, 7), (120, 90)] {
            let s = scaled_poster_size(Size::new(w, h), 330);
            assert_eq!(s.height, 330);
            let expected = 330.0 * w as f64 / h as f64;
            assert!(
                (s.width as f64 - expected).abs() <= 1.0 || s.width == 1,
                "{w}x{h} -> {s:?}"
            );
        }
        assert_eq!(scaled_poster_size(Size::new(200, 100), 330), Size::new(660, 330));
        assert_eq!(scaled_poster_size(Size::new(1200, 900), 330), Size::new(440, 330));
    }

    #[test]
    fn narrow_poster_is_not_cropped() {
        let fit = fit_poster(Size::new(1200, 900), 330, 1220);
        assert_eq!(fit.src_x, 0);
        assert_eq!(fit.src_width, 1200);
        assert_eq!(fit.target, Size::new(440, 330));
    }

    #[test]
    fn panoramic_poster_is_cropped_to_visible_width() {
        // 4000×2 不裁剪会缩放成 660000×330
        for original in [Size::new(4000, 2), Size::new(40000, 2), Size::new(u32::MAX, 1)] {
            let fit = fit_poster(original, 330, 1220);
            assert_eq!(fit.target, Size::new(1220, 330), "{original:?}");
            assert_eq!(fit.src_x + fit.src_width, original.width);
            assert!(fit.src_width >= 1);
        }
        let fit = fit_poster(Size::new(4000, 2), 330, 1220);
        // ceil(1220 × 2 / 330)
        assert_eq!(fit.src_width, 8);

        // 右边缘贴着 canvas - margin，左边缘正好落在 x = 0
        let r = poster_rect(Size::new(1280, 720), fit.target, 60);
        assert_eq!(r.x, 0);
        assert_eq!(r.right(), 1220);
    }

    #[test]
    fn poster_is_anchored_bottom_right() {
        let canvas = Size::new(1280, 720);
        for poster in [Size::new(660, 330), Size::new(440, 330), Size::new(1500, 330)] {
            let r = poster_rect(canvas, poster, 60);
            assert_eq!(r.right(), 1280 - 60);
            assert_eq!(r.bottom(), 720 - 60);
        }
        assert_eq!(
            poster_rect(canvas, Size::new(660, 330), 60),
            PixelRect::new(560, 330, 660, 330)
        );
    }

    #[test]
    fn subtitle_sits_below_title_with_gap() {
        let title = PixelRect::new(60, 60, 420, 57);
        assert_eq!(subtitle_origin(&title, 5), (60, 122));
    }

    #[test]
    fn metadata_block_is_vertically_centered() {
        for (a, b) in [(35, 35), (60, 20), (48, 48), (0, 0), (71, 12), (49, 50)] {
            let layout = metadata_block(720, &spec(), &[Size::new(100, a), Size::new(150, b)]);
            let center2 = 2 * layout.top + layout.height as i32;
            assert!((center2 - 720).abs() <= 1, "heights ({a},{b}) -> {layout:?}");
        }
    }

    #[test]
    fn rows_stack_with_gap_and_center_contents() {
        let layout = metadata_block(720, &spec(), &[Size::new(90, 35), Size::new(200, 60)]);
        assert_eq!(layout.height, 48 + 10 + 60);
        assert_eq!(layout.top, (720 - 118) / 2);

        let first = layout.rows[0];
        assert_eq!(first.row.height, 48);
        assert_eq!(first.icon, PixelRect::new(60, layout.top, 48, 48));
        assert_eq!(first.text.x, 60 + 48 + 10);
        assert_eq!(first.text.y, layout.top + (48 - 35) / 2);

        let second = layout.rows[1];
        assert_eq!(second.row.y, first.row.bottom() + 10);
        assert_eq!(second.icon.y, second.row.y + (60 - 48) / 2);
        assert_eq!(second.text.y, second.row.y);
        assert_eq!(second.icon.x, 60);
    }
}
