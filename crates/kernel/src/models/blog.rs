//! Blog record model.
//!
//! Mirrors the public blog payload of the CMS backend. Only `title` and
//! `content` are required; every other field is optional and unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};

use crate::content::{ContentKind, CtaConfig, CtaPosition, CtaStyle, RelevantArticle};
use crate::error::AppResult;

/// A blog post as delivered by the CMS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogRecord {
    /// Backend identifier.
    #[serde(default)]
    pub id: Option<i64>,

    /// Post title (untrusted text).
    pub title: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,

    /// Raw body, HTML or lightweight markup.
    pub content: String,

    /// Explicit content kind; inferred when absent.
    #[serde(default)]
    pub content_format: Option<ContentKind>,

    pub excerpt: Option<String>,
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub featured_image_url: Option<String>,

    // Author fields
    pub author_name: Option<String>,
    pub author_title: Option<String>,
    pub author_bio: Option<String>,
    pub author_avatar_url: Option<String>,
    pub author_twitter: Option<String>,
    pub author_linkedin: Option<String>,
    pub author_facebook: Option<String>,
    pub author_instagram: Option<String>,
    pub author_github: Option<String>,
    pub author_website: Option<String>,

    // CTA fields
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub cta_style: Option<String>,
    pub cta_position: Option<String>,

    #[serde(default)]
    pub relevant_articles: Option<Vec<RelevantArticle>>,

    /// Estimated reading time in minutes.
    pub read_time: Option<u32>,

    pub published_at: Option<String>,
    pub created_at: Option<String>,
}

/// A post as it appears in the backend's blog listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogListItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub featured_image_url: Option<String>,
    pub read_time: Option<u32>,
    pub published_at: Option<String>,
}

/// The backend wraps responses as `{ "success": true, "data": .. }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Envelope { data } => data,
            Payload::Bare(inner) => inner,
        }
    }
}

impl BlogListItem {
    /// Parse a listing from JSON, bare array or response envelope.
    pub fn list_from_json(json: &str) -> AppResult<Vec<Self>> {
        let payload: Payload<Vec<Self>> = serde_json::from_str(json)?;
        Ok(payload.into_inner())
    }
}

impl BlogRecord {
    /// Create a record with the two required fields.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Parse a record from JSON, accepting either a bare record or the
    /// backend's response envelope.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let payload: Payload<Self> = serde_json::from_str(json)?;
        Ok(payload.into_inner())
    }

    /// Call-to-action configuration with backend defaults applied.
    pub fn cta(&self) -> CtaConfig {
        CtaConfig {
            text: self.cta_text.clone(),
            url: self.cta_url.clone(),
            style: self
                .cta_style
                .as_deref()
                .map(CtaStyle::from_name)
                .unwrap_or_default(),
            position: self
                .cta_position
                .as_deref()
                .map(CtaPosition::from_name)
                .unwrap_or_default(),
        }
    }

    pub fn relevant_articles(&self) -> &[RelevantArticle] {
        self.relevant_articles.as_deref().unwrap_or_default()
    }

    /// Publication timestamp, falling back to creation time.
    pub fn date(&self) -> Option<&str> {
        self.published_at
            .as_deref()
            .or(self.created_at.as_deref())
            .filter(|d| !d.trim().is_empty())
    }
}
