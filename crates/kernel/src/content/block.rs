//! Parsed content blocks and their final HTML rendering.
//!
//! - Paragraph, heading, lists, quote, code and raw HTML fragments
//! - Code blocks use `syntect` for syntax highlighting when a known language
//!   is declared; otherwise the code is escaped

use std::sync::LazyLock;

use serde::Serialize;

use super::sanitize::SafeHtml;
use super::text::escape_html;

/// Heading levels produced by the markup parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub fn level(self) -> u8 {
        match self {
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.level()
    }
}

/// Producer of a raw HTML fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentSource {
    /// An HTML-flavored blog body.
    Content,
    /// A call-to-action inserted by the assembler.
    CallToAction,
    /// The relevant-articles listing inserted by the assembler.
    RelevantArticles,
}

/// One structurally distinct unit of rendered content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        inline_html: SafeHtml,
    },
    Heading {
        level: HeadingLevel,
        inline_html: SafeHtml,
    },
    UnorderedList {
        items: Vec<SafeHtml>,
    },
    OrderedList {
        items: Vec<SafeHtml>,
    },
    Blockquote {
        inline_html: SafeHtml,
    },
    /// Literal code, escaped at render time and never interpreted as HTML.
    CodeBlock {
        code: String,
        language: Option<String>,
    },
    RawHtmlFragment {
        sanitized_html: SafeHtml,
        source: FragmentSource,
    },
}

impl Block {
    /// Whether this block is a call-to-action inserted by the assembler.
    pub fn is_call_to_action(&self) -> bool {
        matches!(
            self,
            Block::RawHtmlFragment {
                source: FragmentSource::CallToAction,
                ..
            }
        )
    }

    /// Render this block to its final HTML.
    pub fn to_html(&self, highlight_code: bool) -> String {
        match self {
            Block::Paragraph { inline_html } => format!("<p>{inline_html}</p>"),
            Block::Heading { level, inline_html } => {
                let tag = level.tag();
                format!("<{tag}>{inline_html}</{tag}>")
            }
            Block::UnorderedList { items } => render_list("ul", items),
            Block::OrderedList { items } => render_list("ol", items),
            Block::Blockquote { inline_html } => format!("<blockquote>{inline_html}</blockquote>"),
            Block::CodeBlock { code, language } => {
                render_code(code, language.as_deref(), highlight_code)
            }
            Block::RawHtmlFragment { sanitized_html, .. } => sanitized_html.to_string(),
        }
    }
}

/// Render a sequence of blocks into a single HTML string.
pub fn render_html(blocks: &[Block], highlight_code: bool) -> String {
    blocks
        .iter()
        .map(|block| block.to_html(highlight_code))
        .collect()
}

fn render_list(tag: &str, items: &[SafeHtml]) -> String {
    let mut html = format!("<{tag}>");
    for item in items {
        html.push_str(&format!("<li>{item}</li>"));
    }
    html.push_str(&format!("</{tag}>"));
    html
}

// Pre-loaded syntect resources (avoid reloading per call).
static SYNTAX_SET: LazyLock<syntect::parsing::SyntaxSet> =
    LazyLock::new(syntect::parsing::SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<syntect::highlighting::ThemeSet> =
    LazyLock::new(syntect::highlighting::ThemeSet::load_defaults);

fn plain_code(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", escape_html(code))
}

/// Render a code block, highlighted when `language` is known to syntect.
///
/// Uses the "InspiredGitHub" theme with a fallback to "base16-ocean.dark".
/// Unknown languages, a missing theme or a highlighting failure all fall
/// back to escaped plain text.
fn render_code(code: &str, language: Option<&str>, highlight: bool) -> String {
    let lang = language.map(str::trim).unwrap_or("");
    if lang.is_empty() || !highlight {
        return match lang {
            "" => plain_code(code),
            lang => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(lang),
                escape_html(code)
            ),
        };
    }

    let ss = &*SYNTAX_SET;
    let ts = &*THEME_SET;

    let Some(syntax) = ss
        .find_syntax_by_token(lang)
        .or_else(|| ss.find_syntax_by_name(lang))
    else {
        return plain_code(code);
    };

    let Some(theme) = ts
        .themes
        .get("InspiredGitHub")
        .or_else(|| ts.themes.get("base16-ocean.dark"))
    else {
        return plain_code(code);
    };

    match syntect::html::highlighted_html_for_string(code, ss, syntax, theme) {
        Ok(highlighted) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(lang),
            highlighted
        ),
        Err(e) => {
            tracing::debug!(error = %e, lang, "syntax highlighting failed");
            plain_code(code)
        }
    }
}
