//! Derivation of slugs, excerpts and plain-text content.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Number of characters kept when an excerpt is derived from content.
pub const EXCERPT_LENGTH: usize = 200;

/// URL-safe, lowercased, hyphenated form of a title.
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

/// Remove markup tags and HTML comments, keeping text content verbatim.
///
/// A `<` not followed by a tag name, `/`, `!` or `?` is kept as text.
/// Quoted attribute values may contain `>` without ending the tag.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // `a < b` is text: a tag opens with a name, `/`, `!` or `?`
        if !tail[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
        {
            out.push('<');
            rest = &tail[1..];
            continue;
        }

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let mut quote: Option<char> = None;
        let mut end = None;
        for (offset, ch) in tail.char_indices().skip(1) {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '>') => {
                    end = Some(offset);
                    break;
                }
                (None, _) => {}
            }
        }

        rest = match end {
            Some(offset) => &tail[offset + 1..],
            // An unterminated tag swallows the remainder.
            None => "",
        };
    }

    out.push_str(rest);
    out
}

/// First [`EXCERPT_LENGTH`] characters of the tag-stripped content.
pub fn excerpt(content: &str) -> String {
    strip_tags(content).chars().take(EXCERPT_LENGTH).collect()
}

/// Raw and HTML renditions of a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub raw: String,
    pub html: String,
}

impl Content {
    /// Fill whichever rendition is missing from the other one.
    ///
    /// Raw text is derived first (tags stripped from the HTML, or empty), then
    /// the HTML mirrors the raw text when it was not supplied.
    pub fn derive(raw: Option<String>, html: Option<String>) -> Self {
        let raw = raw.unwrap_or_else(|| strip_tags(html.as_deref().unwrap_or_default()));
        let html = html.unwrap_or_else(|| raw.clone());
        Self { raw, html }
    }
}

/// Parse the date formats accepted by the post form.
///
/// Naive values are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Tech"), "tech");
        assert_eq!(slugify("Hello, World!  Rust 2024"), "hello-world-rust-2024");
        assert_eq!(slugify("  --Trim me--  "), "trim-me");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Café Société"), "cafe-societe");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>hello</p>"), "hello");
        assert_eq!(
            strip_tags("<p>One <strong>bold</strong> word</p>"),
            "One bold word"
        );
        assert_eq!(strip_tags("plain text"), "plain text");
    }

    #[test]
    fn test_strip_tags_handles_comments_and_quoted_attributes() {
        assert_eq!(strip_tags("a<!-- hidden <b> -->b"), "ab");
        assert_eq!(strip_tags(r#"<a title="x > y" href='/'>link</a>"#), "link");
        assert_eq!(strip_tags("text <unterminated"), "text ");
    }

    #[test]
    fn test_strip_tags_keeps_bare_angle_brackets() {
        assert_eq!(strip_tags("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
        assert_eq!(strip_tags("<p>x <= y</p>"), "x <= y");
        assert_eq!(strip_tags("a <3 b"), "a <3 b");
        assert_eq!(strip_tags("trailing <"), "trailing <");
        assert_eq!(
            excerpt("Prices fall when x < y for a while"),
            "Prices fall when x < y for a while"
        );
    }

    #[test]
    fn test_excerpt_takes_first_200_characters() {
        let long = format!("<div>{}</div>", "é".repeat(250));
        let result = excerpt(&long);
        assert_eq!(result.chars().count(), EXCERPT_LENGTH);
        assert!(result.chars().all(|c| c == 'é'));

        assert_eq!(excerpt("<p>hello</p>"), "hello");
    }

    #[test]
    fn test_content_from_html_only() {
        let content = Content::derive(None, Some("<h1>Title</h1><p>Body</p>".to_string()));
        assert_eq!(content.raw, "TitleBody");
        assert_eq!(content.html, "<h1>Title</h1><p>Body</p>");
    }

    #[test]
    fn test_content_from_raw_only() {
        let content = Content::derive(Some("Just text".to_string()), None);
        assert_eq!(content.raw, "Just text");
        assert_eq!(content.html, "Just text");
    }

    #[test]
    fn test_content_keeps_both_when_supplied() {
        let content = Content::derive(Some("raw".to_string()), Some("<b>html</b>".to_string()));
        assert_eq!(content.raw, "raw");
        assert_eq!(content.html, "<b>html</b>");
    }

    #[test]
    fn test_content_neither_supplied() {
        let content = Content::derive(None, None);
        assert_eq!(content.raw, "");
        assert_eq!(content.html, "");
    }

    #[test]
    fn test_parse_datetime_formats() {
        let rfc = parse_datetime("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let spaced = parse_datetime("2024-05-01 10:30:15").unwrap();
        assert_eq!((spaced.hour(), spaced.second()), (10, 15));

        let local = parse_datetime("2024-05-01T10:30").unwrap();
        assert_eq!(local.minute(), 30);

        let date = parse_datetime("2024-05-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day(), date.hour()), (2024, 5, 1, 0));

        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("2024-13-40").is_none());
    }
}
