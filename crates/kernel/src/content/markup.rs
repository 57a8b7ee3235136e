//! Lightweight markup parser.
//!
//! The body is split into chunks on blank lines and each chunk is classified
//! by its leading token, first match wins:
//!
//! 1. heading (`#### `, `### `, `## `)
//! 2. blockquote (`> `)
//! 3. fenced code (```` ``` ````)
//! 4. unordered list (chunk contains `\n- `)
//! 5. ordered list (chunk starts with `<digits>. `)
//! 6. paragraph
//!
//! Parsing never fails; anything unrecognized becomes paragraph text.

use std::sync::LazyLock;

use regex::Regex;

use super::block::{Block, HeadingLevel};
use super::inline::format_inline;
use super::sanitize::SafeHtml;

#[allow(clippy::expect_used)]
static ORDERED_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("valid regex literal"));
#[allow(clippy::expect_used)]
static ORDERED_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\d+\.\s").expect("valid regex literal"));

const FENCE: &str = "```";
const BULLET_SPLIT: &str = "\n- ";

/// Parse a markup body into an ordered sequence of blocks.
pub fn parse(raw: &str) -> Vec<Block> {
    let normalized = raw.replace("\r\n", "\n");
    let blocks: Vec<Block> = chunks(&normalized).into_iter().map(parse_chunk).collect();
    tracing::debug!(blocks = blocks.len(), "parsed markup content");
    blocks
}

/// Split on blank lines, dropping empty chunks. A fenced code block that
/// contains blank lines is kept together as one chunk.
fn chunks(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut open_fence: Option<String> = None;

    for piece in text.split("\n\n") {
        if let Some(mut fenced) = open_fence.take() {
            fenced.push_str("\n\n");
            fenced.push_str(piece);
            if closes_fence(piece) {
                out.push(fenced);
            } else {
                open_fence = Some(fenced);
            }
            continue;
        }

        let chunk = piece.trim_matches('\n');
        if chunk.trim().is_empty() {
            continue;
        }
        if chunk.starts_with(FENCE) && !is_closed_fence(chunk) {
            open_fence = Some(chunk.to_string());
        } else {
            out.push(chunk.to_string());
        }
    }

    // An unterminated fence runs to the end of the body.
    if let Some(fenced) = open_fence {
        out.push(fenced.trim_end_matches('\n').to_string());
    }
    out
}

/// Whether a fenced chunk already contains its closing fence.
fn is_closed_fence(chunk: &str) -> bool {
    match chunk.split_once('\n') {
        Some((_, body)) => closes_fence(body),
        None => chunk.len() >= 2 * FENCE.len() && chunk[FENCE.len()..].contains(FENCE),
    }
}

fn closes_fence(text: &str) -> bool {
    text.trim_end().ends_with(FENCE)
}

fn parse_chunk(chunk: String) -> Block {
    if let Some((level, text)) = heading(&chunk) {
        return Block::Heading {
            level,
            inline_html: format_inline(text),
        };
    }
    if chunk.starts_with("> ") {
        return Block::Blockquote {
            inline_html: format_inline(&strip_quote_markers(&chunk)),
        };
    }
    if chunk.starts_with(FENCE) {
        let (code, language) = code_block(&chunk);
        return Block::CodeBlock { code, language };
    }
    if chunk.contains(BULLET_SPLIT) {
        return Block::UnorderedList {
            items: bullet_items(&chunk),
        };
    }
    if ORDERED_START.is_match(&chunk) {
        return Block::OrderedList {
            items: ordered_items(&chunk),
        };
    }
    Block::Paragraph {
        inline_html: format_inline(&chunk),
    }
}

fn heading(chunk: &str) -> Option<(HeadingLevel, &str)> {
    [
        ("#### ", HeadingLevel::H4),
        ("### ", HeadingLevel::H3),
        ("## ", HeadingLevel::H2),
    ]
    .into_iter()
    .find_map(|(marker, level)| chunk.strip_prefix(marker).map(|text| (level, text)))
}

fn strip_quote_markers(chunk: &str) -> String {
    chunk
        .lines()
        .map(|line| {
            line.strip_prefix("> ")
                .or_else(|| line.strip_prefix('>'))
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a fenced chunk into its literal code and optional language.
fn code_block(chunk: &str) -> (String, Option<String>) {
    let Some((opening, body)) = chunk.split_once('\n') else {
        // Single-line fence: ```code```
        let inner = chunk.trim_start_matches('`').trim_end_matches('`');
        return (inner.to_string(), None);
    };

    let language = opening
        .trim_start_matches('`')
        .split_whitespace()
        .next()
        .map(str::to_string);

    let trimmed = body.trim_end();
    let code = match trimmed.strip_suffix(FENCE) {
        Some(code) => code.strip_suffix('\n').unwrap_or(code),
        None => body,
    };
    (code.to_string(), language)
}

/// Items of an unordered list. The segment before the first `\n- ` is a
/// lead-in, not an item, unless it carries its own `- ` marker.
fn bullet_items(chunk: &str) -> Vec<SafeHtml> {
    let mut segments = chunk.split(BULLET_SPLIT);
    let lead = segments
        .next()
        .and_then(|first| first.strip_prefix("- "));
    if lead.is_none() {
        tracing::debug!("dropping list lead-in text");
    }
    lead.into_iter()
        .chain(segments)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(format_inline)
        .collect()
}

fn ordered_items(chunk: &str) -> Vec<SafeHtml> {
    let first_stripped = ORDERED_START.replace(chunk, "");
    ORDERED_SPLIT
        .split(&first_stripped)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(format_inline)
        .collect()
}
