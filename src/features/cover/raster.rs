use image::{RgbImage, RgbaImage};
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::error::AppError;

use super::layout::Size;

/// RGB 位图 → 不透明 Pixmap
pub fn rgb_to_pixmap(img: &RgbImage) -> Result<Pixmap, AppError> {
    let mut data = Vec::with_capacity(img.width() as usize * img.height() as usize * 4);
    for px in img.pixels() {
        data.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
    }
    pixmap_from_vec(data, img.width(), img.height())
}

/// RGBA 位图（直通 alpha）→ 预乘 Pixmap，供 source-over 合成时充当自身蒙版
pub fn rgba_to_pixmap(img: &RgbaImage) -> Result<Pixmap, AppError> {
    let mut data = Vec::with_capacity(img.width() as usize * img.height() as usize * 4);
    for px in img.pixels() {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    pixmap_from_vec(data, img.width(), img.height())
}

fn pixmap_from_vec(data: Vec<u8>, width: u32, height: u32) -> Result<Pixmap, AppError> {
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| AppError::ImageRendererError(format!("非法位图尺寸 {width}x{height}")))?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| AppError::ImageRendererError("Failed to create pixmap".to_string()))
}

pub fn pixmap_size(pixmap: &Pixmap) -> Size {
    Size::new(pixmap.width(), pixmap.height())
}

/// 画布编码为 8-bit RGB PNG。
///
/// 压缩与滤波参数固定，相同像素必然得到相同字节。
pub fn encode_png_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, AppError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }

    let mut out = Vec::with_capacity(rgb.len() / 2);
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Default);
        encoder.set_filter(png::FilterType::Paeth);
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::ImageRendererError(format!("PNG write_header error: {e}")))?;
        writer.write_image_data(&rgb).map_err(|e| {
            AppError::ImageRendererError(format!("PNG write_image_data error: {e}"))
        })?;
        writer
            .finish()
            .map_err(|e| AppError::ImageRendererError(format!("PNG finish error: {e}")))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn transparent_pixels_premultiply_to_zero() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        let pm = rgba_to_pixmap(&img).expect("pixmap");
        assert_eq!(&pm.data()[0..4], &[255, 0, 0, 255]);
        assert_eq!(&pm.data()[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn png_output_is_rgb_and_decodable() {
        let img = RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let pm = rgb_to_pixmap(&img).expect("pixmap");
        let bytes = encode_png_rgb(&pm).expect("encode");
        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!(decoded.to_rgb8().get_pixel(2, 1), &image::Rgb([10, 20, 30]));
        assert_eq!(bytes, encode_png_rgb(&pm).expect("encode again"));
    }
}
