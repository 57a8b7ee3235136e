//! Plain-text helpers shared by the parser, assembler and page renderer.

/// Escape the five HTML-significant characters.
///
/// This is text escaping, not allow-listing: the result never contains a tag.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when
/// anything was cut. Trailing whitespace before the ellipsis is removed.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim()),
    }
}
