use std::time::Instant;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::AppError;
use crate::features::caption::{
    CaptionGenerator, apply_title_revision, extract_title_and_subtitle, format_course_info,
    parse_revision_input, to_html_caption,
};
use crate::features::cover::{CoverService, RenderRequest, RenderedCover};
use crate::features::youtube::{YouTubeClient, YouTubeLink};

use super::models::{PendingPost, PostResponse};
use super::session::PostStore;

/// 链接 → 元信息 → 文案 → 封面 的完整流程，以及一次性的标题修改。
#[derive(Clone)]
pub struct PostService {
    youtube: YouTubeClient,
    generator: CaptionGenerator,
    cover: CoverService,
    store: PostStore,
}

impl PostService {
    pub fn new(
        youtube: YouTubeClient,
        generator: CaptionGenerator,
        cover: CoverService,
        store: PostStore,
    ) -> Self {
        Self {
            youtube,
            generator,
            cover,
            store,
        }
    }

    pub async fn create_post(&self, url: &str) -> Result<PostResponse, AppError> {
        let t0 = Instant::now();
        let link = YouTubeLink::parse(url)?;
        tracing::debug!(id = link.id(), "识别链接: {:?}", link);

        let meta = self.youtube.fetch(&link).await?;
        let poster_url = meta
            .thumbnail_url
            .clone()
            .ok_or_else(|| AppError::InvalidInput("У курса нет обложки".to_string()))?;
        let year_text = meta.year_text();
        let duration_text = meta.duration_text();
        let t_meta = t0.elapsed();

        let caption = self.generator.generate(&format_course_info(&meta)).await?;
        let fields = extract_title_and_subtitle(&caption);
        let t_caption = t0.elapsed();

        let rendered = self
            .cover
            .render_cover(RenderRequest {
                poster_source: Some(poster_url.clone()),
                title: fields.title.clone().unwrap_or_default(),
                year: year_text.clone(),
                duration: duration_text.clone(),
                subtitle: fields.subtitle.clone(),
            })
            .await?;

        tracing::info!(
            target: "post_performance",
            "帖子生成完成: 元信息 {}ms, 文案 {}ms, 总计 {}ms",
            t_meta.as_millis(),
            (t_caption - t_meta).as_millis(),
            t0.elapsed().as_millis()
        );

        let title = self.cover.renderer().config().title_or_placeholder(
            fields.title.as_deref().unwrap_or_default(),
        );
        let post_id = self
            .store
            .insert(PendingPost {
                caption: caption.clone(),
                poster_url: poster_url.clone(),
                year_text: year_text.clone(),
                duration_text: duration_text.clone(),
            })
            .await;

        Ok(build_response(
            post_id,
            to_html_caption(&caption),
            title,
            fields.subtitle,
            year_text,
            duration_text,
            poster_url,
            rendered,
            true,
        ))
    }

    /// 确认帖子，丢弃待修改状态
    pub async fn approve(&self, post_id: &str) -> Result<(), AppError> {
        self.store
            .take(post_id)
            .await
            .map(|_| ())
            .ok_or_else(|| not_found(post_id))
    }

    /// 用两行文本替换标题与副标题并重新渲染。
    ///
    /// 先取走待确认状态再渲染，并发的修改只有一个能拿到；渲染失败时放回原处。
    pub async fn revise_title(&self, post_id: &str, text: &str) -> Result<PostResponse, AppError> {
        let (title, subtitle) = parse_revision_input(text)?;
        let pending = self.store.take(post_id).await.ok_or_else(|| not_found(post_id))?;

        let caption = apply_title_revision(&pending.caption, &title, &subtitle);
        let subtitle = (!subtitle.is_empty()).then_some(subtitle);
        let rendered = match self
            .cover
            .render_cover(RenderRequest {
                poster_source: Some(pending.poster_url.clone()),
                title: title.clone(),
                year: pending.year_text.clone(),
                duration: pending.duration_text.clone(),
                subtitle: subtitle.clone(),
            })
            .await
        {
            Ok(rendered) => rendered,
            Err(e) => {
                self.store.restore(post_id, pending).await;
                return Err(e);
            }
        };

        tracing::info!("帖子 {} 标题已修改", post_id);

        Ok(build_response(
            post_id.to_string(),
            to_html_caption(&caption),
            title,
            subtitle,
            pending.year_text.clone(),
            pending.duration_text.clone(),
            pending.poster_url.clone(),
            rendered,
            false,
        ))
    }
}

fn not_found(post_id: &str) -> AppError {
    AppError::NotFound(format!("待确认帖子不存在或已过期: {post_id}"))
}

#[allow(clippy::too_many_arguments)]
fn build_response(
    post_id: String,
    caption: String,
    title: String,
    subtitle: Option<String>,
    year_text: String,
    duration_text: String,
    poster_url: String,
    rendered: RenderedCover,
    revisable: bool,
) -> PostResponse {
    PostResponse {
        post_id,
        caption,
        title,
        subtitle,
        year_text,
        duration_text,
        poster_url,
        cover_png: STANDARD.encode(&rendered.png),
        layout: rendered.layout,
        revisable,
    }
}
