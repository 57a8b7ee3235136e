//! Share intents for the canonical post URL.

use serde::Serialize;

use crate::content::SafeHtml;

/// Canonical URL plus prebuilt share-intent URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    /// Raw canonical URL, also used for copy-to-clipboard.
    pub canonical_url: String,
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
}

impl ShareLinks {
    /// Build share links for the post at `{site_url}/blog/{slug}`.
    ///
    /// `title` must already be PlainText-sanitized.
    pub fn new(site_url: &str, slug: &str, title: &SafeHtml) -> Self {
        let canonical_url = format!(
            "{}/blog/{}",
            site_url.trim_end_matches('/'),
            urlencoding::encode(slug.trim())
        );
        let url = urlencoding::encode(&canonical_url).into_owned();
        let text = urlencoding::encode(&title.unescape_text()).into_owned();

        Self {
            facebook: format!("https://facebook.com/sharer/sharer.php?u={url}"),
            twitter: format!("https://twitter.com/intent/tweet?url={url}&text={text}"),
            linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
            canonical_url,
        }
    }
}
