//! Markup subset used in advice text
//!
//! Presentation relies on exactly these tags for styling; adding one is a
//! breaking change for every renderer.

/// Tags allowed in `AnalysisResult::text`
pub const ALLOWED_TAGS: &[&str] = &["<b>", "</b>", "<br/>", "<ul>", "</ul>", "<li>", "</li>"];

pub const LINE_BREAK: &str = "<br/>";

pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", text)
}

/// Render items as an unordered list
pub fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let body: String = items
        .into_iter()
        .map(|item| format!("<li>{}</li>", item.as_ref()))
        .collect();
    format!("<ul>{}</ul>", body)
}

/// True when every `<...>` tag in `text` belongs to [`ALLOWED_TAGS`]
pub fn is_allowed_markup(text: &str) -> bool {
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let after = &rest[start..];
        let Some(end) = after.find('>') else {
            return false;
        };
        let tag = &after[..=end];
        if !ALLOWED_TAGS.contains(&tag) {
            return false;
        }
        rest = &after[end + 1..];
    }
    true
}

/// Flatten markup into plain terminal text
pub fn to_plain_text(text: &str) -> String {
    text.replace(LINE_BREAK, "\n")
        .replace("<li>", "\n  - ")
        .replace("</li>", "")
        .replace("<ul>", "")
        .replace("</ul>", "\n")
        .replace("<b>", "")
        .replace("</b>", "")
}
