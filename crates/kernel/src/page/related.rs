//! Related posts listed beside the article.

use serde::Serialize;

use super::media::{optimize_image, placeholder_image};
use crate::content::{Profile, SafeHtml, sanitize};
use crate::models::{BlogListItem, BlogRecord};

/// How many related posts the detail view shows.
pub const RELATED_POSTS_LIMIT: usize = 3;

const THUMBNAIL_WIDTH: u32 = 400;

/// A sanitized entry of the related-posts list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedPost {
    pub title: SafeHtml,
    pub category: Option<SafeHtml>,
    /// Site-relative link, `/blog/{slug}`.
    pub url: String,
    /// Thumbnail, the placeholder when the post has no usable image.
    pub image: String,
}

/// Pick up to `limit` posts sharing the current post's category.
///
/// The current post itself is skipped, matched by id or by slug. A post
/// without a category has no related posts. Candidate order is kept.
pub fn related_posts(
    current: &BlogRecord,
    candidates: &[BlogListItem],
    limit: usize,
) -> Vec<RelatedPost> {
    let Some(category) = current
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|post| post.category.as_deref().map(str::trim) == Some(category))
        .filter(|post| !is_same_post(current, post))
        .take(limit)
        .map(RelatedPost::from_item)
        .collect()
}

fn is_same_post(current: &BlogRecord, post: &BlogListItem) -> bool {
    match (current.id, post.id) {
        (Some(a), Some(b)) => a == b,
        _ => !post.slug.trim().is_empty() && post.slug.trim() == current.slug.trim(),
    }
}

impl RelatedPost {
    fn from_item(post: &BlogListItem) -> Self {
        Self {
            title: sanitize(&post.title, Profile::PlainText),
            category: post
                .category
                .as_deref()
                .map(|c| sanitize(c, Profile::PlainText))
                .filter(|c| !c.is_empty()),
            url: format!("/blog/{}", urlencoding::encode(post.slug.trim())),
            image: post
                .featured_image_url
                .as_deref()
                .and_then(|url| optimize_image(url, THUMBNAIL_WIDTH))
                .unwrap_or_else(|| placeholder_image(THUMBNAIL_WIDTH)),
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn item(id: i64, slug: &str, category: Option<&str>) -> BlogListItem {
        BlogListItem {
            id: Some(id),
            title: format!("Post <b>{slug}</b>"),
            slug: slug.to_string(),
            category: category.map(str::to_string),
            ..BlogListItem::default()
        }
    }

    fn current() -> BlogRecord {
        let mut record = BlogRecord::new("Current", "Body");
        record.id = Some(1);
        record.slug = "current".to_string();
        record.category = Some("AI".to_string());
        record
    }

    #[test]
    fn same_category_without_current_post() {
        let candidates = vec![
            item(1, "current", Some("AI")),
            item(2, "two", Some("AI")),
            item(3, "three", Some("Cloud")),
            item(4, "four", Some("AI")),
            item(5, "five", None),
            item(6, "six", Some("AI")),
            item(7, "seven", Some("AI")),
        ];
        let related = related_posts(&current(), &candidates, RELATED_POSTS_LIMIT);

        let urls: Vec<&str> = related.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/blog/two", "/blog/four", "/blog/six"]);
        assert_eq!(related[0].title.as_str(), "Post two");
        assert_eq!(related[0].category.as_ref().unwrap().as_str(), "AI");
        assert_eq!(related[0].image, placeholder_image(THUMBNAIL_WIDTH));
    }

    #[test]
    fn current_post_matched_by_slug_without_ids() {
        let mut record = current();
        record.id = None;
        let mut same = item(1, "current", Some("AI"));
        same.id = None;

        assert!(related_posts(&record, &[same], 3).is_empty());
    }

    #[test]
    fn no_category_means_no_related_posts() {
        let mut record = current();
        record.category = Some("  ".to_string());
        let candidates = vec![item(2, "two", Some("AI"))];
        assert!(related_posts(&record, &candidates, 3).is_empty());
    }

    #[test]
    fn thumbnails_are_optimized() {
        let mut post = item(2, "two", Some("AI"));
        post.featured_image_url =
            Some("https://res.cloudinary.com/demo/image/upload/a.jpg".to_string());
        let related = related_posts(&current(), &[post], 3);
        assert_eq!(
            related[0].image,
            "https://res.cloudinary.com/demo/image/upload/w_400,f_auto,q_auto,c_fill/a.jpg"
        );
    }
}
