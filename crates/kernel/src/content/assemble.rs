//! Render assembler: merges content blocks with layout insertions.
//!
//! The call-to-action is placed before and/or after the content according to
//! its configured position; relevant articles are appended as a final block.
//! Incomplete or unsafe insertions are omitted, never rendered partially.

use serde::{Deserialize, Serialize};

use super::block::{Block, FragmentSource};
use super::sanitize::{Profile, SanitizationProfile, normalize_url, sanitize};
use super::text::escape_html;

/// Visual style of the call-to-action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

impl CtaStyle {
    /// Parse a CMS style name; unknown names fall back to `Primary`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "secondary" => Self::Secondary,
            "outline" => Self::Outline,
            _ => Self::Primary,
        }
    }

    fn class(self) -> &'static str {
        match self {
            CtaStyle::Primary => "cta-primary",
            CtaStyle::Secondary => "cta-secondary",
            CtaStyle::Outline => "cta-outline",
        }
    }
}

/// Where the call-to-action appears relative to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaPosition {
    Top,
    #[default]
    Bottom,
    Both,
    None,
}

impl CtaPosition {
    /// Parse a CMS position name; unknown names disable the CTA.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "both" => Self::Both,
            _ => Self::None,
        }
    }

    fn shows_top(self) -> bool {
        matches!(self, CtaPosition::Top | CtaPosition::Both)
    }

    fn shows_bottom(self) -> bool {
        matches!(self, CtaPosition::Bottom | CtaPosition::Both)
    }
}

/// Admin-configured call-to-action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CtaConfig {
    pub text: Option<String>,
    pub url: Option<String>,
    pub style: CtaStyle,
    pub position: CtaPosition,
}

/// A related link listed after the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantArticle {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
}

/// Assemble the final ordered document.
pub fn assemble(blocks: Vec<Block>, cta: &CtaConfig, relevant: &[RelevantArticle]) -> Vec<Block> {
    let cta_block = cta_block(cta);
    let mut out = Vec::with_capacity(blocks.len() + 3);

    if cta.position.shows_top() {
        out.extend(cta_block.clone());
    }
    out.extend(blocks);
    if cta.position.shows_bottom() {
        out.extend(cta_block);
    }
    if let Some(block) = relevant_articles_block(relevant) {
        out.push(block);
    }
    out
}

/// Build the CTA block, or `None` when text or URL is missing or unsafe.
fn cta_block(cta: &CtaConfig) -> Option<Block> {
    if cta.position == CtaPosition::None {
        return None;
    }
    let text = cta.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let url = cta.url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let (Some(text), Some(url)) = (text, url) else {
        tracing::debug!("call-to-action omitted: text or url missing");
        return None;
    };
    if !SanitizationProfile::rich().allows_link(url) {
        tracing::warn!(url, "call-to-action omitted: url scheme not allowed");
        return None;
    }

    let class = cta.style.class();
    let html = format!(
        "<div class=\"cta\"><a href=\"{}\" class=\"cta-button {class}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div>",
        escape_html(url),
        escape_html(text)
    );
    Some(Block::RawHtmlFragment {
        sanitized_html: sanitize(&html, Profile::Rich),
        source: FragmentSource::CallToAction,
    })
}

/// Build the relevant-articles block from the articles with a safe URL.
fn relevant_articles_block(articles: &[RelevantArticle]) -> Option<Block> {
    let mut items = String::new();
    for article in articles {
        let Some(url) = normalize_url(&article.url) else {
            tracing::warn!(url = %article.url, "relevant article skipped: unsafe url");
            continue;
        };
        let title = sanitize(&article.title, Profile::PlainText);
        items.push_str(&format!(
            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\"><strong>{title}</strong></a>",
            escape_html(&url)
        ));
        if let Some(description) = article.description.as_deref().filter(|d| !d.trim().is_empty()) {
            let description = sanitize(description, Profile::PlainText);
            items.push_str(&format!("<p>{description}</p>"));
        }
        items.push_str("</li>");
    }
    if items.is_empty() {
        return None;
    }

    let html = format!(
        "<div class=\"relevant-articles\"><h3>Relevant Articles</h3><ul>{items}</ul></div>"
    );
    Some(Block::RawHtmlFragment {
        sanitized_html: sanitize(&html, Profile::Rich),
        source: FragmentSource::RelevantArticles,
    })
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::markup::parse;

    fn cta(position: CtaPosition) -> CtaConfig {
        CtaConfig {
            text: Some("Book a demo".to_string()),
            url: Some("https://example.com/demo".to_string()),
            style: CtaStyle::Secondary,
            position,
        }
    }

    fn html_of(block: &Block) -> &str {
        match block {
            Block::RawHtmlFragment { sanitized_html, .. } => sanitized_html.as_str(),
            other => panic!("expected fragment, got {other:?}"),
        }
    }

    #[test]
    fn both_places_cta_around_content() {
        let content = parse("First\n\nSecond");
        let out = assemble(content, &cta(CtaPosition::Both), &[]);
        assert_eq!(out.len(), 4);
        assert!(out[0].is_call_to_action());
        assert!(!out[1].is_call_to_action());
        assert!(!out[2].is_call_to_action());
        assert!(out[3].is_call_to_action());
        assert_eq!(out.iter().filter(|b| b.is_call_to_action()).count(), 2);
    }

    #[test]
    fn top_and_bottom_positions() {
        let top = assemble(parse("Body"), &cta(CtaPosition::Top), &[]);
        assert!(top[0].is_call_to_action());
        assert_eq!(top.len(), 2);

        let bottom = assemble(parse("Body"), &cta(CtaPosition::Bottom), &[]);
        assert!(bottom[1].is_call_to_action());
        assert_eq!(bottom.len(), 2);
    }

    #[test]
    fn none_position_yields_no_cta() {
        let out = assemble(parse("Body"), &cta(CtaPosition::None), &[]);
        assert_eq!(out.len(), 1);
        assert!(!out.iter().any(Block::is_call_to_action));
    }

    #[test]
    fn missing_url_or_text_yields_no_cta() {
        let mut config = cta(CtaPosition::Both);
        config.url = None;
        assert!(!assemble(parse("Body"), &config, &[]).iter().any(Block::is_call_to_action));

        let mut config = cta(CtaPosition::Both);
        config.text = Some("   ".to_string());
        assert!(!assemble(parse("Body"), &config, &[]).iter().any(Block::is_call_to_action));
    }

    #[test]
    fn javascript_cta_url_is_omitted() {
        let mut config = cta(CtaPosition::Both);
        config.url = Some("javascript:alert(1)".to_string());
        assert!(!assemble(parse("Body"), &config, &[]).iter().any(Block::is_call_to_action));
    }

    #[test]
    fn cta_markup_is_escaped_and_styled() {
        let mut config = cta(CtaPosition::Top);
        config.text = Some("<img src=x onerror=alert(1)>Go".to_string());
        let out = assemble(Vec::new(), &config, &[]);
        let html = html_of(&out[0]);
        assert!(!html.contains("<img"), "got: {html}");
        assert!(html.contains("cta-secondary"));
        assert!(html.contains("href=\"https://example.com/demo\""));
    }

    #[test]
    fn relevant_articles_are_appended_last() {
        let articles = vec![
            RelevantArticle {
                title: "<b>Scaling</b> AI".to_string(),
                description: Some("How to <script>x</script>grow".to_string()),
                url: "https://example.com/scaling".to_string(),
            },
            RelevantArticle {
                title: "Bad".to_string(),
                description: None,
                url: "javascript:alert(1)".to_string(),
            },
        ];
        let out = assemble(parse("Body"), &cta(CtaPosition::Bottom), &articles);
        assert_eq!(out.len(), 3);
        assert!(out[1].is_call_to_action());
        assert!(matches!(
            out[2],
            Block::RawHtmlFragment {
                source: FragmentSource::RelevantArticles,
                ..
            }
        ));

        let html = html_of(&out[2]);
        assert!(html.contains("<strong>Scaling AI</strong>"), "got: {html}");
        assert!(html.contains("<p>How to grow</p>"), "got: {html}");
        assert!(!html.contains("<b>"));
        assert!(!html.contains("javascript"));
        assert!(!html.contains("Bad"));
    }

    #[test]
    fn article_urls_are_normalized() {
        let articles = vec![
            RelevantArticle {
                title: "Quoted".to_string(),
                description: None,
                url: "/next\" onmouseover=\"alert(1)".to_string(),
            },
            RelevantArticle {
                title: "Elsewhere".to_string(),
                description: None,
                url: "/\\evil.example/x".to_string(),
            },
        ];
        let out = assemble(Vec::new(), &CtaConfig::default(), &articles);
        let html = html_of(&out[0]);
        assert!(html.contains("href=\"/next%22%20onmouseover=%22alert(1)\""), "got: {html}");
        assert!(!html.contains("onmouseover=\""), "got: {html}");
        assert!(!html.contains("Elsewhere"), "got: {html}");
    }

    #[test]
    fn no_safe_articles_means_no_block() {
        let articles = vec![RelevantArticle {
            title: "Bad".to_string(),
            description: None,
            url: "data:text/html,x".to_string(),
        }];
        assert_eq!(assemble(parse("Body"), &CtaConfig::default(), &articles).len(), 1);
    }

    #[test]
    fn style_and_position_names() {
        assert_eq!(CtaStyle::from_name("Outline"), CtaStyle::Outline);
        assert_eq!(CtaStyle::from_name("neon"), CtaStyle::Primary);
        assert_eq!(CtaPosition::from_name("BOTH"), CtaPosition::Both);
        assert_eq!(CtaPosition::from_name("sidebar"), CtaPosition::None);
    }
}
