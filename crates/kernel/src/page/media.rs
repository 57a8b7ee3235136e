//! Featured image URL handling.

use url::Url;

use crate::content::normalize_url;

/// Stock image used where a listing needs a picture and the post has none.
pub fn placeholder_image(width: u32) -> String {
    format!(
        "https://images.unsplash.com/photo-1504384308090-c894fdcc538d?auto=format&fit=crop&w={width}&q=80"
    )
}

/// Rewrite an image URL for delivery at `width` pixels.
///
/// Cloudinary URLs get an upload transformation, Unsplash URLs get sizing
/// query parameters, anything else is returned in normalized form. Blank or
/// unsafe URLs yield `None`.
pub fn optimize_image(url: &str, width: u32) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let Some(url) = normalize_url(url) else {
        tracing::warn!(url, "image dropped: unsafe url");
        return None;
    };

    let host = Url::parse(&url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase));
    let optimized = match host.as_deref() {
        Some(host) if is_host(host, "cloudinary.com") && url.contains("/upload/") => {
            url.replacen("/upload/", &format!("/upload/w_{width},f_auto,q_auto,c_fill/"), 1)
        }
        Some(host) if is_host(host, "unsplash.com") => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{url}{sep}w={width}&q=80&auto=format&fit=crop")
        }
        _ => url,
    };
    Some(optimized)
}

fn is_host(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}
