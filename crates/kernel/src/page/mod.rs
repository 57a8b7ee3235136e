//! Blog page rendering.
//!
//! Turns a [`BlogRecord`] into the ordered block document and the sanitized
//! metadata the blog-detail view displays around it.

mod author;
mod media;
mod meta;
mod related;
mod share;

use serde::Serialize;

pub use author::{AuthorCard, SocialLink, SocialPlatform};
pub use media::{optimize_image, placeholder_image};
pub use meta::{UNKNOWN_DATE, excerpt, format_date};
pub use related::{RELATED_POSTS_LIMIT, RelatedPost, related_posts};
pub use share::ShareLinks;

use crate::content::{
    Block, ClassifierMode, ContentKind, FragmentSource, Profile, SafeHtml, assemble, parse,
    render_html, resolve_kind, sanitize,
};
use crate::models::BlogRecord;

/// Library-level rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Base of canonical URLs, without trailing slash.
    pub site_url: String,
    pub classifier: ClassifierMode,
    /// Length of the excerpt derived from the body.
    pub excerpt_length: usize,
    pub max_tags: usize,
    pub image_width: u32,
    pub highlight_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            classifier: ClassifierMode::default(),
            excerpt_length: 200,
            max_tags: 4,
            image_width: 1200,
            highlight_code: true,
        }
    }
}

/// Everything the blog-detail view needs, already sanitized.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPage {
    pub title: SafeHtml,
    pub category: Option<SafeHtml>,
    pub tags: Vec<SafeHtml>,
    pub excerpt: SafeHtml,
    pub author: Option<AuthorCard>,
    /// Display date, `"Month D, YYYY"` or `"Recent"`.
    pub published: String,
    pub read_time: Option<u32>,
    /// Optimized featured image; absent when the record has none or it is
    /// unsafe.
    pub featured_image: Option<String>,
    pub share: ShareLinks,
    pub kind: ContentKind,
    pub blocks: Vec<Block>,
    /// The blocks rendered to a single HTML string.
    pub body_html: String,
}

/// Render the body of a blog record into its final block sequence.
pub fn render_blog(record: &BlogRecord, options: &RenderOptions) -> Vec<Block> {
    let kind = resolve_kind(record.content_format, &record.content, options.classifier);
    render_body(record, kind)
}

fn render_body(record: &BlogRecord, kind: ContentKind) -> Vec<Block> {
    let blocks = match kind {
        ContentKind::MarkupFlavored => parse(&record.content),
        ContentKind::HtmlFlavored => {
            let sanitized_html = sanitize(&record.content, Profile::Rich);
            if sanitized_html.is_empty() {
                Vec::new()
            } else {
                vec![Block::RawHtmlFragment {
                    sanitized_html,
                    source: FragmentSource::Content,
                }]
            }
        }
    };
    assemble(blocks, &record.cta(), record.relevant_articles())
}

/// Render the full blog page: blocks plus sanitized metadata.
pub fn render_blog_page(record: &BlogRecord, options: &RenderOptions) -> BlogPage {
    let kind = resolve_kind(record.content_format, &record.content, options.classifier);
    let blocks = render_body(record, kind);
    let body_html = render_html(&blocks, options.highlight_code);

    let title = sanitize(&record.title, Profile::PlainText);
    let category = record
        .category
        .as_deref()
        .map(|c| sanitize(c, Profile::PlainText))
        .filter(|c| !c.is_empty());
    let tags = record
        .tags
        .iter()
        .map(|tag| sanitize(tag, Profile::PlainText))
        .filter(|tag| !tag.is_empty())
        .take(options.max_tags)
        .collect();

    tracing::debug!(
        slug = %record.slug,
        %kind,
        blocks = blocks.len(),
        "rendered blog page"
    );

    BlogPage {
        share: ShareLinks::new(&options.site_url, &record.slug, &title),
        title,
        category,
        tags,
        excerpt: excerpt(
            record.excerpt.as_deref(),
            &record.content,
            options.excerpt_length,
        ),
        author: AuthorCard::from_record(record),
        published: format_date(record.date()),
        read_time: record.read_time,
        featured_image: record
            .featured_image_url
            .as_deref()
            .and_then(|url| optimize_image(url, options.image_width)),
        kind,
        blocks,
        body_html,
    }
}
