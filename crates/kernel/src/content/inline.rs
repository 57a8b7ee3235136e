//! Inline formatting pass for markup text.
//!
//! Bold, italic, inline code and links are rewritten to HTML in that order,
//! then the fragment goes through the Rich sanitizer. Unclosed markers are
//! left as literal characters.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::sanitize::{Profile, SafeHtml, sanitize};
use super::text::escape_html;

#[allow(clippy::expect_used)]
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex literal"));
#[allow(clippy::expect_used)]
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex literal"));
#[allow(clippy::expect_used)]
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+?)`").expect("valid regex literal"));
#[allow(clippy::expect_used)]
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("valid regex literal"));

/// Apply the inline pass to `text`, returning sanitized HTML.
pub fn format_inline(text: &str) -> SafeHtml {
    let html = BOLD.replace_all(text, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");
    let html = INLINE_CODE.replace_all(&html, "<code>${1}</code>");
    // Label and URL are escaped as text so neither can open a new tag.
    let html = LINK.replace_all(&html, |caps: &Captures<'_>| {
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(&caps[2]),
            escape_html(&caps[1])
        )
    });
    sanitize(&html, Profile::Rich)
}
