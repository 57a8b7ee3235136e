//! Author card shown beside the article.

use serde::Serialize;

use crate::content::{Profile, SafeHtml, normalize_url, sanitize};
use crate::models::BlogRecord;

/// Social network of an author profile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Linkedin,
    Facebook,
    Instagram,
    Github,
    Website,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

/// Sanitized author details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCard {
    pub name: SafeHtml,
    pub title: Option<SafeHtml>,
    pub bio: Option<SafeHtml>,
    pub avatar_url: Option<String>,
    /// First letter of the name, shown when there is no avatar.
    pub initial: String,
    pub socials: Vec<SocialLink>,
}

impl AuthorCard {
    /// Build the card, or `None` when the record names no author.
    pub fn from_record(record: &BlogRecord) -> Option<Self> {
        let name = plain(record.author_name.as_deref())?;
        let initial = name
            .unescape_text()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();

        let avatar_url = safe_link(record.author_avatar_url.as_deref(), "author avatar");

        let socials = [
            (SocialPlatform::Twitter, &record.author_twitter),
            (SocialPlatform::Linkedin, &record.author_linkedin),
            (SocialPlatform::Facebook, &record.author_facebook),
            (SocialPlatform::Instagram, &record.author_instagram),
            (SocialPlatform::Github, &record.author_github),
            (SocialPlatform::Website, &record.author_website),
        ]
        .into_iter()
        .filter_map(|(platform, url)| {
            safe_link(url.as_deref(), "author social link").map(|url| SocialLink { platform, url })
        })
        .collect();

        Some(Self {
            name,
            title: plain(record.author_title.as_deref()),
            bio: plain(record.author_bio.as_deref()),
            avatar_url,
            initial,
            socials,
        })
    }
}

/// PlainText-sanitize an optional field, treating blank results as absent.
fn plain(value: Option<&str>) -> Option<SafeHtml> {
    value
        .map(|v| sanitize(v.trim(), Profile::PlainText))
        .filter(|v| !v.is_empty())
}

/// Normalize an optional link, dropping blank or unsafe values.
fn safe_link(url: Option<&str>, what: &str) -> Option<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    let normalized = normalize_url(url);
    if normalized.is_none() {
        tracing::warn!(url, what, "dropping unsafe url");
    }
    normalized
}
