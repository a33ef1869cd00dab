/// 从生成的文案中提取的封面文字
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionFields {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// 标题超过该字符数时截断为前几个词
const MAX_TITLE_CHARS: usize = 30;
const TRUNCATED_TITLE_WORDS: usize = 3;
/// 以这些前缀开头的行是正文，不当作副标题
const NON_SUBTITLE_PREFIXES: [&str; 5] = ["🗓", "⏰", "🔹", "♦️", "<a"];

/// 去掉模型偶尔包裹的 ``` 代码块标记，连同留下的首尾空行
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```", "").trim().to_string()
}

/// 第一处 `<b>…</b>`（大小写不敏感）为标题，紧随的一行可能是副标题。
pub fn extract_title_and_subtitle(text: &str) -> CaptionFields {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut fields = CaptionFields::default();

    for (i, line) in lines.iter().enumerate() {
        let Some(title) = bold_inner(line) else {
            continue;
        };
        fields.title = Some(title.trim().to_string());
        if let Some(next) = lines.get(i + 1).map(|l| l.trim()) {
            if !next.is_empty() && !NON_SUBTITLE_PREFIXES.iter().any(|p| next.starts_with(p)) {
                fields.subtitle = Some(next.to_string());
            }
        }
        break;
    }

    if let Some(title) = fields.title.as_ref().filter(|t| t.chars().count() > MAX_TITLE_CHARS) {
        let words: Vec<&str> = title.split_whitespace().collect();
        let head = words
            .iter()
            .take(TRUNCATED_TITLE_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if fields.subtitle.is_none() {
            let rest = words
                .iter()
                .skip(TRUNCATED_TITLE_WORDS)
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            fields.subtitle = (!rest.is_empty()).then_some(rest);
        }
        fields.title = Some(head);
    }

    fields
}

/// 同一行内第一对 `<b>`/`</b>` 之间的内容（非贪婪）
fn bold_inner(line: &str) -> Option<&str> {
    let lower = line.to_ascii_lowercase();
    let start = lower.find("<b>")? + 3;
    let end = lower[start..].find("</b>")? + start;
    Some(&line[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_bold_title_and_next_line() {
        let text = "<b>Курс по SQL</b>\nОсновы баз данных\n🗓 2022";
        let f = extract_title_and_subtitle(text);
        assert_eq!(f.title.as_deref(), Some("Курс по SQL"));
        assert_eq!(f.subtitle.as_deref(), Some("Основы баз данных"));
    }

    #[test]
    fn decorated_next_line_is_not_a_subtitle() {
        for next in ["🗓 2022", "⏰ 15 часов", "🔹 пункт", "♦️ пункт", "<a href=\"x\">ссылка</a>", "   "] {
            let text = format!("<B>Python</B>\n{next}");
            let f = extract_title_and_subtitle(&text);
            assert_eq!(f.title.as_deref(), Some("Python"));
            assert_eq!(f.subtitle, None, "{next}");
        }
    }

    #[test]
    fn long_title_is_cut_to_three_words() {
        let text = "Вступление\n<b>Полный курс по разработке веб приложений на Rust</b>";
        let f = extract_title_and_subtitle(text);
        assert_eq!(f.title.as_deref(), Some("Полный курс по"));
        assert_eq!(f.subtitle.as_deref(), Some("разработке веб приложений на Rust"));

        let text = "<b>Полный курс по разработке веб приложений на Rust</b>\nС нуля";
        let f = extract_title_and_subtitle(text);
        assert_eq!(f.title.as_deref(), Some("Полный курс по"));
        assert_eq!(f.subtitle.as_deref(), Some("С нуля"));
    }

    #[test]
    fn no_bold_means_no_fields() {
        assert_eq!(extract_title_and_subtitle("просто текст"), CaptionFields::default());
    }

    #[test]
    fn code_fences_are_removed() {
        assert_eq!(strip_code_fences("```\n<b>T</b>\n```"), "<b>T</b>");
    }
}
