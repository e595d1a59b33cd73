//! Property-line tokenizer.

use std::sync::LazyLock;

use regex::Regex;

/// `TAG[;PARAM]:VALUE`; the first colon after the tag (and optional
/// parameter block) starts the value.
static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)(?:;(.+?))?:(.+)").expect("line regex should be valid"));

/// Physical line terminator of a feed.
pub const LINE_TERMINATOR: &str = "\r\n";

/// One `TAG[;PARAM]:VALUE` property line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLine<'a> {
    /// Property name, e.g. `DTSTART`.
    pub tag: &'a str,
    /// Parameter block after the first `;`, e.g. `TZID=Europe/Stockholm`.
    pub param: Option<&'a str>,
    /// Property value with `\,` unescaped.
    pub value: String,
}

impl<'a> FeedLine<'a> {
    /// Decomposes a single raw line.
    ///
    /// Returns `None` when the line does not have the `TAG:VALUE` shape.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = LINE_PATTERN.captures(line)?;
        let tag = caps.get(1)?.as_str();
        let param = caps.get(2).map(|m| m.as_str());
        let value = caps.get(3)?.as_str().replace("\\,", ",");
        Some(Self { tag, param, value })
    }
}

/// Splits a feed into property lines, skipping lines that do not match.
pub fn tokenize(data: &str) -> impl Iterator<Item = FeedLine<'_>> {
    data.split(LINE_TERMINATOR).filter_map(FeedLine::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_and_value() {
        let line = FeedLine::parse("SUMMARY:Math").unwrap();
        assert_eq!(line.tag, "SUMMARY");
        assert_eq!(line.param, None);
        assert_eq!(line.value, "Math");
    }

    #[test]
    fn parses_parameter_block() {
        let line = FeedLine::parse("DTSTART;TZID=Europe/Stockholm:20261020T080000").unwrap();
        assert_eq!(line.tag, "DTSTART");
        assert_eq!(line.param, Some("TZID=Europe/Stockholm"));
        assert_eq!(line.value, "20261020T080000");
    }

    #[test]
    fn value_keeps_embedded_colons() {
        let line = FeedLine::parse("URL:http://example.com:8080/a").unwrap();
        assert_eq!(line.tag, "URL");
        assert_eq!(line.value, "http://example.com:8080/a");
    }

    #[test]
    fn unescapes_commas() {
        let line = FeedLine::parse(r"LOCATION:Room\,101").unwrap();
        assert_eq!(line.value, "Room,101");
    }

    #[test]
    fn skips_malformed_lines() {
        assert!(FeedLine::parse("").is_none());
        assert!(FeedLine::parse("no colon here").is_none());
        assert!(FeedLine::parse(":value-only").is_none());
        assert!(FeedLine::parse("TAG:").is_none());
    }

    #[test]
    fn tokenize_splits_on_crlf() {
        let data = "BEGIN:VEVENT\r\ngarbage\r\n\r\nEND:VEVENT\r\n";
        let tags: Vec<_> = tokenize(data).map(|l| l.tag).collect();
        assert_eq!(tags, vec!["BEGIN", "END"]);
    }

    #[test]
    fn tokenize_does_not_split_bare_newlines() {
        let data = "SUMMARY:a\nLOCATION:b";
        let lines: Vec<_> = tokenize(data).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tag, "SUMMARY");
    }
}
