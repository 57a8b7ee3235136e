//! Content rendering pipeline.
//!
//! This module provides:
//! - Classifier: decides whether a body is HTML or lightweight markup
//! - Markup parser: turns markup into typed blocks
//! - Sanitizer: allow-list HTML cleaning with named profiles
//! - Assembler: places the call-to-action and relevant articles

pub mod assemble;
pub mod block;
pub mod classify;
mod inline;
pub mod markup;
pub mod sanitize;
mod text;

pub use assemble::{CtaConfig, CtaPosition, CtaStyle, RelevantArticle, assemble};
pub use block::{Block, FragmentSource, HeadingLevel, render_html};
pub use classify::{ClassifierMode, ContentKind, classify, classify_anchored, resolve_kind};
pub use inline::format_inline;
pub use markup::parse;
pub use sanitize::{
    Profile, SafeHtml, SanitizationProfile, Sanitizer, is_safe_url, normalize_url, sanitize,
};
pub use text::{escape_html, truncate_text};
