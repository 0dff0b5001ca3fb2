//! Small text helpers used by the fetcher and the Notion uploader.
//!
//! - HTML tag stripping for summaries
//! - RFC 2822 date normalization for the Notion `date` property
//! - Character-based chunking for Notion's rich-text length limit
//! - Log-friendly truncation of response bodies

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove every `<...>` tag span from `text`.
///
/// Only markup is removed. Entities, whitespace and everything else are
/// left exactly as they were.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
/// ```
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Convert an RFC 2822 timestamp into a `YYYY-MM-DD` date.
///
/// The calendar date is taken in the timestamp's own offset; no timezone
/// conversion happens. Anything that does not parse as RFC 2822 is returned
/// unchanged.
pub fn normalize_published_at(raw: &str) -> String {
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Empty input yields no pieces.
pub fn chunk_chars(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for c in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_nested_tags() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_strip_html_attributes_and_entities() {
        assert_eq!(
            strip_html(r#"<a href="https://example.com" class="x">Read</a> more &amp; <br/>"#),
            "Read more &amp; "
        );
        assert_eq!(strip_html("no markup"), "no markup");
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn test_normalize_rfc2822() {
        assert_eq!(
            normalize_published_at("Mon, 09 Feb 2026 10:06:00 +0900"),
            "2026-02-09"
        );
    }

    #[test]
    fn test_normalize_keeps_local_calendar_date() {
        // 23:30 at -0500 is already the next day in UTC; the source offset wins.
        assert_eq!(
            normalize_published_at("Mon, 09 Feb 2026 23:30:00 -0500"),
            "2026-02-09"
        );
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_published_at("2026-02-09"), "2026-02-09");
        assert_eq!(
            normalize_published_at("2026-02-09T10:06:00Z"),
            "2026-02-09T10:06:00Z"
        );
        assert_eq!(normalize_published_at("yesterday"), "yesterday");
    }

    #[test]
    fn test_chunk_chars() {
        assert!(chunk_chars("", 5).is_empty());
        assert_eq!(chunk_chars("abc", 5), vec!["abc"]);
        assert_eq!(chunk_chars("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(chunk_chars("ééé", 2), vec!["éé", "é"]);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        assert_eq!(truncate_for_log("éé", 3), "é…(+2 bytes)");
    }
}
