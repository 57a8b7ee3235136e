//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::content::ClassifierMode;
use crate::page::RenderOptions;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public site URL used for canonical and share links
    /// (default: http://localhost:3000).
    pub site_url: String,

    /// Content kind inference for records without `content_format`:
    /// "substring" or "anchored" (default: "substring").
    pub classifier: ClassifierMode,

    /// Length of the excerpt derived from the body (default: 200).
    pub excerpt_length: usize,

    /// Maximum tags shown on a page (default: 4).
    pub max_tags: usize,

    /// Featured image width in pixels (default: 1200).
    pub image_width: u32,

    /// Syntax highlighting of fenced code (default: true).
    pub highlight_code: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let site_url = env::var("INKPRESS_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let classifier = env::var("INKPRESS_CLASSIFIER")
            .unwrap_or_else(|_| "substring".to_string())
            .parse()
            .context("INKPRESS_CLASSIFIER must be 'substring' or 'anchored'")?;

        let excerpt_length = env::var("INKPRESS_EXCERPT_LENGTH")
            .unwrap_or_else(|_| "200".to_string())
            .parse()
            .context("INKPRESS_EXCERPT_LENGTH must be a valid usize")?;

        let max_tags = env::var("INKPRESS_MAX_TAGS")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .context("INKPRESS_MAX_TAGS must be a valid usize")?;

        let image_width = env::var("INKPRESS_IMAGE_WIDTH")
            .unwrap_or_else(|_| "1200".to_string())
            .parse()
            .context("INKPRESS_IMAGE_WIDTH must be a valid u32")?;

        let highlight_code = env::var("INKPRESS_HIGHLIGHT_CODE")
            .map(|v| parse_bool(&v))
            .unwrap_or(Ok(true))
            .context("INKPRESS_HIGHLIGHT_CODE must be true or false")?;

        Ok(Self {
            site_url,
            classifier,
            excerpt_length,
            max_tags,
            image_width,
            highlight_code,
        })
    }

    /// Rendering settings for the library.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            site_url: self.site_url.clone(),
            classifier: self.classifier,
            excerpt_length: self.excerpt_length,
            max_tags: self.max_tags,
            image_width: self.image_width,
            highlight_code: self.highlight_code,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean '{other}'"),
    }
}
