//! Content kind classification.
//!
//! Blog bodies arrive either as hand-written HTML or as lightweight markup.
//! A record may declare its kind explicitly; when it does not, the kind is
//! inferred by one of two classifiers selected in configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The parsing strategy a body needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "html")]
    HtmlFlavored,
    #[serde(rename = "markdown", alias = "markup")]
    MarkupFlavored,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentKind::HtmlFlavored => "html",
            ContentKind::MarkupFlavored => "markdown",
        })
    }
}

/// How to infer the kind of a body that does not declare one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierMode {
    /// Any structural marker anywhere in the body.
    #[default]
    Substring,
    /// The body must start with a block-level HTML tag.
    Anchored,
}

impl FromStr for ClassifierMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "anchored" => Ok(Self::Anchored),
            other => Err(AppError::InvalidConfig(format!(
                "unknown classifier '{other}', expected 'substring' or 'anchored'"
            ))),
        }
    }
}

/// Markers whose presence anywhere marks a body as HTML.
const HTML_MARKERS: &[&str] = &["<p>", "<h2>", "<iframe>"];

/// Block-level tags accepted as a document-start marker.
const BLOCK_START_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "div",
    "iframe",
    "ul",
    "ol",
    "blockquote",
    "table",
    "pre",
    "figure",
    "section",
    "article",
];

/// Classify by substring search for structural markers.
///
/// A markup body whose author literally typed `<p>` is reported as HTML;
/// records that care should declare their kind.
pub fn classify(raw: &str) -> ContentKind {
    if HTML_MARKERS.iter().any(|marker| raw.contains(marker)) {
        ContentKind::HtmlFlavored
    } else {
        ContentKind::MarkupFlavored
    }
}

/// Classify by requiring a block-level start tag at the beginning.
pub fn classify_anchored(raw: &str) -> ContentKind {
    let Some(rest) = raw.trim_start().strip_prefix('<') else {
        return ContentKind::MarkupFlavored;
    };
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let (name, after) = rest.split_at(name_len);
    let name = name.to_ascii_lowercase();
    let terminated = after
        .chars()
        .next()
        .is_some_and(|c| c == '>' || c.is_ascii_whitespace());
    if terminated && BLOCK_START_TAGS.contains(&name.as_str()) {
        ContentKind::HtmlFlavored
    } else {
        ContentKind::MarkupFlavored
    }
}

/// Resolve the kind of a body: an explicit declaration wins, inference
/// with `mode` is the fallback.
pub fn resolve_kind(declared: Option<ContentKind>, raw: &str, mode: ClassifierMode) -> ContentKind {
    let kind = match (declared, mode) {
        (Some(kind), _) => kind,
        (None, ClassifierMode::Substring) => classify(raw),
        (None, ClassifierMode::Anchored) => classify_anchored(raw),
    };
    tracing::debug!(%kind, declared = declared.is_some(), ?mode, "classified content");
    kind
}
