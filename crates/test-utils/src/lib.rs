//! Inkpress test utilities.
//!
//! Helpers for integration testing: blog record fixtures, sample bodies
//! and assertion utilities for rendered HTML.

use serde_json::{Map, Value as JsonValue, json};

/// Create a test blog record with the two required fields.
pub fn test_blog(title: &str, content: &str) -> TestBlog {
    let mut fields = Map::new();
    fields.insert("title".to_string(), json!(title));
    fields.insert("content".to_string(), json!(content));
    TestBlog {
        fields,
        relevant_articles: Vec::new(),
    }
}

/// A blog record builder producing backend-shaped JSON.
#[derive(Debug, Clone)]
pub struct TestBlog {
    pub fields: Map<String, JsonValue>,
    pub relevant_articles: Vec<JsonValue>,
}

impl TestBlog {
    /// Set any top-level field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Set the slug.
    pub fn with_slug(self, slug: &str) -> Self {
        self.with_field("slug", json!(slug))
    }

    /// Declare the content format ("html" or "markdown").
    pub fn with_format(self, format: &str) -> Self {
        self.with_field("content_format", json!(format))
    }

    /// Set the call-to-action.
    pub fn with_cta(self, text: &str, url: &str, style: &str, position: &str) -> Self {
        self.with_field("cta_text", json!(text))
            .with_field("cta_url", json!(url))
            .with_field("cta_style", json!(style))
            .with_field("cta_position", json!(position))
    }

    /// Set the author name.
    pub fn with_author(self, name: &str) -> Self {
        self.with_field("author_name", json!(name))
    }

    /// Set the tags.
    pub fn with_tags(self, tags: &[&str]) -> Self {
        self.with_field("tags", json!(tags))
    }

    /// Append a relevant article.
    pub fn with_relevant_article(
        mut self,
        title: &str,
        description: Option<&str>,
        url: &str,
    ) -> Self {
        self.relevant_articles.push(json!({
            "title": title,
            "description": description,
            "url": url,
        }));
        self
    }

    /// The record as a JSON value.
    pub fn to_value(&self) -> JsonValue {
        let mut fields = self.fields.clone();
        if !self.relevant_articles.is_empty() {
            fields.insert(
                "relevant_articles".to_string(),
                JsonValue::Array(self.relevant_articles.clone()),
            );
        }
        JsonValue::Object(fields)
    }

    /// The record as a JSON string.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// The record wrapped in the backend's `{success, data}` envelope.
    pub fn to_envelope_json(&self) -> String {
        json!({ "success": true, "data": self.to_value() }).to_string()
    }
}

/// Sample bodies.
pub mod bodies {
    /// A markup body covering every block kind.
    pub const MARKUP: &str = "## Getting Started\n\n\
        Rust is **fast** and *safe*. Read [the book](https://doc.rust-lang.org/book/).\n\n\
        ### Install\n\n\
        Steps:\n- Download rustup\n- Run the installer\n\n\
        1. Open a terminal\n2. Run `cargo new`\n\n\
        > Fearless concurrency\n> for everyone\n\n\
        ```rust\nfn main() {}\n```";

    /// An HTML body with a video embed.
    pub const HTML: &str = "<h2>Demo</h2><p>Watch the walkthrough.</p>\
        <iframe src=\"https://www.youtube.com/embed/abc123\" width=\"560\" height=\"315\" \
        frameborder=\"0\" allowfullscreen></iframe>";

    /// An HTML body carrying common XSS payloads.
    pub const MALICIOUS_HTML: &str = "<p onclick=\"steal()\">Hi</p>\
        <script>alert(document.cookie)</script>\
        <img src=\"x\" onerror=\"alert(1)\">\
        <a href=\"javascript:alert(1)\">click</a>\
        <iframe src=\"javascript:alert(1)\"></iframe>";
}

/// Assertion helpers for rendered output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that rendered HTML carries no executable script context.
    pub fn no_script(html: &str) {
        let lower = html.to_ascii_lowercase();
        for needle in ["<script", "onerror=", "onclick=", "onload=", "javascript:"] {
            not_contains(&lower, needle);
        }
    }
}
