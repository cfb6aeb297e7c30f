use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

/// Length of a summary derived from full HTML content.
pub const SUMMARY_MAX_CHARS: usize = 160;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static RE_IMG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\s(?:data-src|src)\s*=\s*["']([^"'>]+)["']"#)
        .expect("img regex")
});

/// Strip tags, decode entities and collapse whitespace.
pub fn plain_text(html: &str) -> String {
    let stripped = RE_TAGS.replace_all(html, " ");
    let decoded = decode_html_entities(&stripped);
    RE_WS.replace_all(&decoded, " ").trim().to_string()
}

/// Cut to `max_chars` characters, appending `...` only when something was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", text[..byte_idx].trim_end()),
        None => text.to_string(),
    }
}

/// First `src` or `data-src` of an `<img>` tag in an HTML fragment.
pub fn first_image_src(html: &str) -> Option<String> {
    RE_IMG
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_html_entities(m.as_str().trim()).to_string())
        .filter(|src| !src.is_empty())
}

/// Collapse runs of whitespace (used for scraped node text).
pub fn collapse_whitespace(text: &str) -> String {
    RE_WS.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_and_decodes() {
        let html = "<p>Hello&nbsp;<b>world</b> &amp; friends</p>\n<br/>";
        assert_eq!(plain_text(html), "Hello world & friends");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_with_ellipsis("short", 160), "short");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "x".repeat(200);
        let out = truncate_with_ellipsis(&text, SUMMARY_MAX_CHARS);
        assert_eq!(out.len(), SUMMARY_MAX_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate_with_ellipsis(&text, 4), "éééé...");
    }

    #[test]
    fn test_first_image_src() {
        let html = r#"<div><img class="hero" src="https://cdn.example.com/a.png" alt="a"><img src="b.png"></div>"#;
        assert_eq!(
            first_image_src(html),
            Some("https://cdn.example.com/a.png".into())
        );
    }

    #[test]
    fn test_first_image_data_src() {
        let html = r#"<img loading="lazy" data-src="/lazy.jpg">"#;
        assert_eq!(first_image_src(html), Some("/lazy.jpg".into()));
    }

    #[test]
    fn test_no_image() {
        assert_eq!(first_image_src("<p>No pictures here</p>"), None);
    }
}
