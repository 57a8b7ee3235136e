//! Date and excerpt formatting for the page header.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::content::{Profile, SafeHtml, sanitize, truncate_text};

/// Shown when a record carries no usable date.
pub const UNKNOWN_DATE: &str = "Recent";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Tags that end a line of text when rendered.
#[allow(clippy::expect_used)]
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:p|div|h[1-6]|li|blockquote|pre|tr|td|th|table|ul|ol)\s*>|<br\s*/?>")
        .expect("valid regex literal")
});

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex literal"));

/// Format a backend timestamp as `"Month D, YYYY"`.
///
/// Accepts RFC 3339, naive ISO date-times and bare dates. Anything else
/// yields [`UNKNOWN_DATE`].
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };
    match parse_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => {
            tracing::debug!(raw, "unparseable date");
            UNKNOWN_DATE.to_string()
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// The page excerpt: the record's own excerpt, or the opening of the body.
///
/// The body is reduced to text before truncation so a cut never lands
/// inside a tag or an entity.
pub fn excerpt(excerpt: Option<&str>, content: &str, max_chars: usize) -> SafeHtml {
    if let Some(excerpt) = excerpt.filter(|e| !e.trim().is_empty()) {
        return sanitize(excerpt, Profile::PlainText);
    }
    let text = body_text(content);
    sanitize(&truncate_text(&text, max_chars), Profile::PlainText)
}

/// Body text with one space between block-level elements.
fn body_text(content: &str) -> String {
    let spaced = BLOCK_BREAK.replace_all(content, "$0 ");
    let text = sanitize(&spaced, Profile::PlainText).unescape_text();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
