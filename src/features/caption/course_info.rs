use std::fmt::Write;

use crate::features::youtube::{CourseKind, CourseMetadata};

const NO_DESCRIPTION: &str = "Описание отсутствует";

/// 生成喂给文案模型的课程摘要。
pub fn format_course_info(meta: &CourseMetadata) -> String {
    let description = if meta.description.trim().is_empty() {
        NO_DESCRIPTION
    } else {
        meta.description.as_str()
    };
    let link = meta.link.clean_url();

    // 写入 String 不会失败
    let mut out = String::new();
    match meta.kind {
        CourseKind::Video => {
            let _ = writeln!(out, "📼 Название курса: {}", meta.title);
            let _ = writeln!(out, "📅 Год курса: {}", meta.year_text());
            let _ = writeln!(out, "⏳ Продолжительность курса: {}", meta.duration_text());
            let _ = writeln!(out, "📝 Описание: {description}");
            let _ = write!(out, "🔗 Ссылка на курс: {link}");
        }
        CourseKind::Playlist => {
            let _ = writeln!(out, "📼 Название плейлиста: {}", meta.title);
            if let Some(year) = meta.year {
                let _ = writeln!(out, "📅 Год курса: {year}");
            }
            let _ = writeln!(out, "📝 Описание: {description}");
            let _ = writeln!(out, "⏳ Продолжительность курса: {}", meta.duration_text());
            let _ = writeln!(out, "🔗 Ссылка на курс: {link}");
            let _ = writeln!(out, "🎬 Всего видео: {}", meta.videos.len());
            for (idx, video) in meta.videos.iter().enumerate() {
                let _ = writeln!(out, "\n{}. {}", idx + 1, video.title);
                let _ = writeln!(
                    out,
                    "   📅 Дата публикации: {}",
                    video.published_at.format("%Y-%m-%d")
                );
                let _ = write!(out, "   ⏱ Продолжительность: {} мин", video.duration_seconds / 60);
            }
        }
    }
    out
}
