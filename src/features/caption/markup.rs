use crate::error::AppError;

/// 把 `**粗体**` / `__斜体__` 转成 HTML 标签，成对交替开闭。
///
/// 未闭合的最后一个标记会在末尾补上闭合标签。
pub fn to_html_caption(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut bold_open = false;
    let mut italic_open = false;
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("**") {
            out.push_str(if bold_open { "</b>" } else { "<b>" });
            bold_open = !bold_open;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("__") {
            out.push_str(if italic_open { "</i>" } else { "<i>" });
            italic_open = !italic_open;
            rest = tail;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }

    if italic_open {
        out.push_str("</i>");
    }
    if bold_open {
        out.push_str("</b>");
    }
    out
}

/// 解析用户提交的新标题：必须恰好两行（标题、副标题）。
pub fn parse_revision_input(text: &str) -> Result<(String, String), AppError> {
    let lines: Vec<&str> = text.trim().split('\n').map(str::trim).collect();
    match lines.as_slice() {
        [title, subtitle] if !title.is_empty() => Ok((title.to_string(), subtitle.to_string())),
        _ => Err(AppError::Validation(
            "Введите заголовок в две строчки.".to_string(),
        )),
    }
}

/// 用新标题替换文案第一行（包成 `<b>`），新副标题替换第二行。
pub fn apply_title_revision(caption: &str, title: &str, subtitle: &str) -> String {
    let mut lines: Vec<String> = caption.split('\n').map(str::to_string).collect();
    let bold = format!("<b>{title}</b>");
    match lines.len() {
        0 => return format!("{bold}\n{subtitle}"),
        1 => {
            lines[0] = bold;
            lines.push(subtitle.to_string());
        }
        _ => {
            lines[0] = bold;
            lines[1] = subtitle.to_string();
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_pairs_become_tags() {
        assert_eq!(
            to_html_caption("**Курс** по __SQL__ и **Python**"),
            "<b>Курс</b> по <i>SQL</i> и <b>Python</b>"
        );
        assert_eq!(to_html_caption("**открыт"), "<b>открыт</b>");
        assert_eq!(to_html_caption("без разметки"), "без разметки");
    }

    #[test]
    fn revision_requires_exactly_two_lines() {
        assert_eq!(
            parse_revision_input(" Новый курс \r\n Подзаголовок ").expect("two lines"),
            ("Новый курс".to_string(), "Подзаголовок".to_string())
        );
        for bad in ["одна строка", "раз\nдва\nтри", "\nтолько подзаголовок"] {
            assert!(
                matches!(parse_revision_input(bad), Err(AppError::Validation(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn revision_replaces_first_two_lines() {
        let caption = "<b>Старый</b>\nСтарый подзаголовок\n🗓 2022";
        assert_eq!(
            apply_title_revision(caption, "Новый", "Новый подзаголовок"),
            "<b>Новый</b>\nНовый подзаголовок\n🗓 2022"
        );
        assert_eq!(apply_title_revision("одна", "T", "S"), "<b>T</b>\nS");
    }
}
