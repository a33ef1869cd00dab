use std::time::Duration;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use reqwest::Client;

use crate::config::CoverConfig;
use crate::error::PosterFetchError;
use crate::http;

use super::layout::{Size, fit_poster};

/// 解码后的海报（真实图片或纯色占位图）
#[derive(Debug, Clone)]
pub struct PosterImage {
    rgba: RgbaImage,
    placeholder: bool,
}

impl PosterImage {
    pub fn decode(bytes: &[u8]) -> Result<Self, PosterFetchError> {
        let img = image::load_from_memory(bytes)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(PosterFetchError::Decode("图片尺寸为 0".to_string()));
        }
        Ok(Self {
            rgba: img.to_rgba8(),
            placeholder: false,
        })
    }

    /// 纯色占位图（默认 1200×900 红色）
    pub fn placeholder(cfg: &CoverConfig) -> Self {
        let [r, g, b, a] = cfg.placeholder_rgba;
        Self {
            rgba: RgbaImage::from_pixel(
                cfg.placeholder_width.max(1),
                cfg.placeholder_height.max(1),
                image::Rgba([r, g, b, a]),
            ),
            placeholder: true,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.rgba.width(), self.rgba.height())
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Lanczos3 等比缩放到目标高度，宽度不超过 `max_width`（超出时裁掉左侧）。
    pub fn resized_to_height(&self, target_height: u32, max_width: u32) -> RgbaImage {
        let fit = fit_poster(self.size(), target_height, max_width);
        if fit.src_x == 0 && fit.target == self.size() {
            return self.rgba.clone();
        }
        if fit.src_x == 0 {
            return imageops::resize(&self.rgba, fit.target.width, fit.target.height, FilterType::Lanczos3);
        }
        let visible =
            imageops::crop_imm(&self.rgba, fit.src_x, 0, fit.src_width, self.rgba.height()).to_image();
        imageops::resize(&visible, fit.target.width, fit.target.height, FilterType::Lanczos3)
    }
}

/// 把拉取结果落地为海报：任何失败都记 WARN 并换成占位图，不向上传播。
pub fn resolve(
    url: &str,
    fetched: Result<Vec<u8>, PosterFetchError>,
    cfg: &CoverConfig,
) -> PosterImage {
    match fetched.and_then(|bytes| PosterImage::decode(&bytes)) {
        Ok(poster) => poster,
        Err(e) => {
            tracing::warn!(poster_url = %url, "海报获取失败，改用占位图: {e}");
            PosterImage::placeholder(cfg)
        }
    }
}

/// 海报下载器：带超时与体积上限的单次 GET，不重试。
#[derive(Clone)]
pub struct PosterFetcher {
    client: Client,
    max_bytes: u64,
}

impl PosterFetcher {
    /// 默认 10s 超时复用全局 client，其它超时值单独建 client。
    pub fn from_config(cfg: &CoverConfig) -> Result<Self, reqwest::Error> {
        let client = if cfg.poster_timeout_secs == 10 {
            http::client_timeout_10s()?.clone()
        } else {
            http::client_with_timeout(Duration::from_secs(cfg.poster_timeout_secs))?
        };
        Ok(Self::with_client(client, cfg.poster_max_bytes))
    }

    pub fn with_client(client: Client, max_bytes: u64) -> Self {
        Self { client, max_bytes }
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PosterFetchError> {
        let mut resp = self.client.get(url).send().await?.error_for_status()?;

        if let Some(len) = resp.content_length() {
            if len > self.max_bytes {
                return Err(PosterFetchError::TooLarge(self.max_bytes));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if body.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(PosterFetchError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_solid_red_1200x900() {
        let p = PosterImage::placeholder(&CoverConfig::default());
        assert!(p.is_placeholder());
        assert_eq!(p.size(), Size::new(1200, 900));
        assert_eq!(p.rgba.get_pixel(599, 449), &image::Rgba([255, 0, 0, 255]));

        let resized = p.resized_to_height(330, 1220);
        assert_eq!(resized.dimensions(), (440, 330));
    }

    #[test]
    fn undecodable_bytes_fall_back_to_placeholder() {
        let cfg = CoverConfig::default();
        let p = resolve("http://poster.test/a.jpg", Ok(b"not an image".to_vec()), &cfg);
        assert!(p.is_placeholder());

        let p = resolve("http://poster.test/a.jpg", Err(PosterFetchError::Status(404)), &cfg);
        assert!(p.is_placeholder());
    }

    #[test]
    fn real_image_keeps_its_pixels() {
        let src = RgbaImage::from_pixel(200, 100, image::Rgba([0, 128, 255, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        src.write_to(&mut bytes, image::ImageFormat::Png).expect("encode png");

        let p = resolve("http://poster.test/ok.png", Ok(bytes.into_inner()), &CoverConfig::default());
        assert!(!p.is_placeholder());
        assert_eq!(p.size(), Size::new(200, 100));
        assert_eq!(p.resized_to_height(330, 1220).dimensions(), (660, 330));
    }

    #[test]
    fn panoramic_poster_keeps_right_edge_within_canvas() {
        // 左半蓝、右半绿的 4000×2 长条
        let mut src = RgbaImage::from_pixel(4000, 2, image::Rgba([0, 0, 255, 255]));
        for x in 2000..4000 {
            for y in 0..2 {
                src.put_pixel(x, y, image::Rgba([0, 255, 0, 255]));
            }
        }
        let p = PosterImage {
            rgba: src,
            placeholder: false,
        };

        let resized = p.resized_to_height(330, 1220);
        assert_eq!(resized.dimensions(), (1220, 330));
        // 只剩右侧的绿色部分
        assert_eq!(resized.get_pixel(0, 165), &image::Rgba([0, 255, 0, 255]));
        assert_eq!(resized.get_pixel(1219, 165), &image::Rgba([0, 255, 0, 255]));
    }
}
