//! Sanitization policy engine.
//!
//! Every piece of HTML that reaches a rendered page passes through here.
//! Two standard profiles exist:
//! - `Rich`: structural and embed tags for genuine blog content
//! - `PlainText`: no tags at all, for names, bios, category and tag labels
//!
//! Disallowed tags, attributes and URIs are silently dropped. Cleaning never
//! fails: a malicious fragment degrades to its safe remainder.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use ammonia::UrlRelative;
use regex::Regex;
use serde::Serialize;
use url::{Position, Url};

/// HTML that has been produced by the sanitizer.
///
/// There is no public constructor; the only way to obtain a value is to run
/// markup through a [`Sanitizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Borrow the sanitized markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper, returning the sanitized markup.
    pub fn into_string(self) -> String {
        self.0
    }

    /// True when sanitizing left nothing behind.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the entities the serializer emits for text nodes.
    ///
    /// Only meaningful for `PlainText` output, which never contains tags.
    /// Used where the text leaves HTML entirely (share intents, initials).
    pub fn unescape_text(&self) -> String {
        self.0
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&nbsp;", "\u{a0}")
            .replace("&amp;", "&")
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tags whose content is removed along with the tag itself, unless the
/// profile allows the tag.
///
/// Besides script and style this covers the elements whose children the
/// HTML parser treats specially (raw text, foreign content, inert
/// templates). Keeping those children would change the tree on a second
/// parse or surface raw markup as text.
const CLEAN_CONTENT_TAGS: &[&str] = &[
    "script", "style", "select", "template", "noscript", "textarea", "svg", "math", "iframe",
    "noembed", "noframes", "xmp",
];

/// Upper bound on re-cleaning before output is considered stable.
const MAX_CLEAN_PASSES: usize = 4;

/// Base that relative navigation targets are resolved against.
const NAVIGATION_BASE: &str = "http://inkpress.invalid/";

#[allow(clippy::expect_used)]
static NAVIGATION_BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(NAVIGATION_BASE).expect("valid base url literal"));

/// A CSS escape: hex code point with optional trailing space, or any
/// single escaped character.
#[allow(clippy::expect_used)]
static CSS_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:([0-9a-fA-F]{1,6})[ \t\n\r\f]?|(\n|\r\n|\r|\f)|(.))")
        .expect("valid regex literal")
});

#[allow(clippy::expect_used)]
static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?(?:\*/|$)").expect("valid regex literal"));

/// Media types accepted in `data:` URIs on `img[src]`.
const DATA_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
    "image/avif",
    "image/bmp",
];

/// Fragments that make a `style` attribute value unacceptable.
const UNSAFE_STYLE_PATTERNS: &[&str] = &[
    "expression(",
    "url(",
    "javascript:",
    "@import",
    "behavior:",
    "-moz-binding",
    "image(",
    "image-set(",
    "cross-fade(",
];

/// Immutable allow-list configuration for one sanitization profile.
#[derive(Debug, Clone)]
pub struct SanitizationProfile {
    name: &'static str,
    tags: HashSet<&'static str>,
    attributes: HashSet<&'static str>,
    url_schemes: HashSet<&'static str>,
    allow_data_attributes: bool,
}

impl SanitizationProfile {
    /// Create an empty profile that permits nothing.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tags: HashSet::new(),
            attributes: HashSet::new(),
            url_schemes: HashSet::new(),
            allow_data_attributes: false,
        }
    }

    /// Profile for author-supplied rich content.
    pub fn rich() -> Self {
        Self::new("rich")
            .with_tags(&[
                "p",
                "br",
                "strong",
                "em",
                "u",
                "s",
                "h1",
                "h2",
                "h3",
                "h4",
                "h5",
                "h6",
                "ul",
                "ol",
                "li",
                "blockquote",
                "pre",
                "code",
                "a",
                "img",
                "iframe",
                "div",
                "span",
                "table",
                "thead",
                "tbody",
                "tr",
                "td",
                "th",
            ])
            .with_attributes(&[
                "href",
                "src",
                "alt",
                "title",
                "class",
                "id",
                "target",
                "rel",
                "width",
                "height",
                "frameborder",
                "allowfullscreen",
                "allow",
                "style",
            ])
            .with_url_schemes(&[
                "http", "https", "mailto", "tel", "callto", "sms", "cid", "xmpp", "data",
            ])
            .allow_data_attributes(true)
    }

    /// Profile for fields displayed as plain text: every tag is stripped.
    pub fn plain_text() -> Self {
        Self::new("plain_text")
    }

    /// Add tags to the allow-list.
    pub fn with_tags(mut self, tags: &[&'static str]) -> Self {
        self.tags.extend(tags.iter().copied());
        self
    }

    /// Add attributes to the allow-list (valid on every allowed tag).
    pub fn with_attributes(mut self, attributes: &[&'static str]) -> Self {
        self.attributes.extend(attributes.iter().copied());
        self
    }

    /// Add URI schemes accepted in `href`/`src` positions.
    pub fn with_url_schemes(mut self, schemes: &[&'static str]) -> Self {
        self.url_schemes.extend(schemes.iter().copied());
        self
    }

    /// Permit `data-*` attributes.
    pub fn allow_data_attributes(mut self, allow: bool) -> Self {
        self.allow_data_attributes = allow;
        self
    }

    /// Profile name, for logging.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `tag` is on the allow-list. Case-insensitive.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag.to_ascii_lowercase().as_str())
    }

    /// Whether `attribute` may appear on allowed tags, counting `data-*`
    /// when the profile permits it.
    pub fn allows_attribute(&self, attribute: &str) -> bool {
        let attribute = attribute.to_ascii_lowercase();
        self.attributes.contains(attribute.as_str())
            || (self.allow_data_attributes && attribute.starts_with("data-"))
    }

    /// Whether absolute URLs with `scheme` survive in `href`/`src`.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.url_schemes
            .contains(scheme.to_ascii_lowercase().as_str())
    }

    /// Check a URL destined for a link `href`.
    ///
    /// Relative URLs are accepted when they stay on the current site;
    /// absolute URLs must use an allowed scheme other than `data`, which is
    /// never a navigation target.
    pub fn allows_link(&self, url: &str) -> bool {
        match url_scheme(url) {
            Some(scheme) => scheme != "data" && self.allows_scheme(&scheme),
            None => is_safe_url(url),
        }
    }
}

/// A compiled sanitizer for one profile.
pub struct Sanitizer {
    profile: SanitizationProfile,
    cleaner: ammonia::Builder<'static>,
}

impl Sanitizer {
    /// Compile a sanitizer from a profile.
    pub fn new(profile: SanitizationProfile) -> Self {
        // ammonia rejects a tag that is both allowed and content-cleaned.
        let clean_content: HashSet<&'static str> = CLEAN_CONTENT_TAGS
            .iter()
            .copied()
            .filter(|tag| !profile.tags.contains(tag))
            .collect();
        let mut cleaner = ammonia::Builder::empty();
        cleaner
            .tags(profile.tags.clone())
            .generic_attributes(profile.attributes.clone())
            .url_schemes(profile.url_schemes.clone())
            .clean_content_tags(clean_content)
            .url_relative(UrlRelative::PassThrough)
            .link_rel(None)
            .strip_comments(true)
            .attribute_filter(filter_attribute);
        if profile.allow_data_attributes {
            cleaner.generic_attribute_prefixes(HashSet::from(["data-"]));
        }
        Self { profile, cleaner }
    }

    /// The profile this sanitizer was compiled from.
    pub fn profile(&self) -> &SanitizationProfile {
        &self.profile
    }

    /// Clean `html`, returning only allow-listed markup.
    ///
    /// The parser can rebuild a serialized tree differently (misnested
    /// blocks, foster-parented table content), so the output is cleaned
    /// again until it no longer changes. Cleaning the result is a no-op.
    pub fn clean(&self, html: &str) -> SafeHtml {
        if html.is_empty() {
            return SafeHtml::default();
        }
        let mut out = self.pass(html);
        for _ in 1..MAX_CLEAN_PASSES {
            let next = self.pass(&out);
            if next == out {
                return SafeHtml(out);
            }
            out = next;
        }
        tracing::warn!(
            profile = self.profile.name,
            "sanitized output did not settle after {MAX_CLEAN_PASSES} passes"
        );
        SafeHtml(out)
    }

    fn pass(&self, html: &str) -> String {
        let cleaned = self.cleaner.clean(html).to_string();
        strip_iframe_text(&cleaned).unwrap_or(cleaned)
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer")
            .field("profile", &self.profile.name)
            .finish_non_exhaustive()
    }
}

/// The two standard profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Rich,
    PlainText,
}

static RICH: LazyLock<Sanitizer> = LazyLock::new(|| Sanitizer::new(SanitizationProfile::rich()));
static PLAIN_TEXT: LazyLock<Sanitizer> =
    LazyLock::new(|| Sanitizer::new(SanitizationProfile::plain_text()));

impl Profile {
    /// The shared sanitizer for this profile.
    pub fn sanitizer(self) -> &'static Sanitizer {
        match self {
            Profile::Rich => &RICH,
            Profile::PlainText => &PLAIN_TEXT,
        }
    }
}

/// Sanitize `html` against one of the standard profiles.
pub fn sanitize(html: &str, profile: Profile) -> SafeHtml {
    profile.sanitizer().clean(html)
}

/// Check whether `url` is safe to use as a navigation target.
///
/// Accepts absolute `http`/`https` URLs and relative URLs that stay on the
/// current site. Rejects every other scheme, empty input and anything a
/// browser would resolve to another host (`//host`, `/\host`, `/<TAB>/host`).
pub fn is_safe_url(url: &str) -> bool {
    normalize_url(url).is_some()
}

/// Validate a navigation target and return its normalized serialization.
///
/// Characters that cannot appear raw in a URL (quotes, spaces, angle
/// brackets) come back percent-encoded, so the result is safe to place in a
/// double-quoted attribute. Relative input is resolved against the site
/// root and returned without scheme or host. Returns `None` for anything
/// [`is_safe_url`] rejects.
pub fn normalize_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = &*NAVIGATION_BASE_URL;
            let joined = base.join(trimmed).ok()?;
            let same_site = joined.scheme() == base.scheme()
                && joined.host_str() == base.host_str()
                && joined.port() == base.port();
            same_site.then(|| joined[Position::BeforePath..].to_string())
        }
        Err(_) => None,
    }
}

/// Extract the lowercased scheme of an absolute URL, if it has one.
///
/// Whitespace and control characters are ignored the way browsers ignore
/// them, so `java\tscript:` still reports `javascript`.
fn url_scheme(url: &str) -> Option<String> {
    let compact: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take_while(|c| *c != '/' && *c != '?' && *c != '#')
        .collect();
    let (scheme, _) = compact.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(scheme.to_ascii_lowercase())
    } else {
        None
    }
}

fn is_raster_data_uri(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("data:") else {
        return false;
    };
    DATA_IMAGE_TYPES.iter().any(|media_type| {
        rest.strip_prefix(media_type)
            .is_some_and(|tail| tail.starts_with(';') || tail.starts_with(','))
    })
}

/// Resolve CSS escapes the way a CSS tokenizer does.
///
/// `\75 rl(` and `u\rl(` both read as `url(`.
fn decode_css_escapes(value: &str) -> Cow<'_, str> {
    CSS_ESCAPE.replace_all(value, |caps: &regex::Captures<'_>| {
        if let Some(hex) = caps.get(1) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
                .filter(|c| *c != '\0')
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .to_string()
        } else if caps.get(2).is_some() {
            String::new()
        } else {
            caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default()
        }
    })
}

fn has_unsafe_style(value: &str) -> bool {
    let decoded = decode_css_escapes(value);
    let uncommented = CSS_COMMENT.replace_all(&decoded, "");
    let compact: String = uncommented
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    UNSAFE_STYLE_PATTERNS.iter().any(|p| compact.contains(p))
}

/// Drop the text inside `iframe` elements of serialized output.
///
/// The serializer writes iframe children verbatim instead of escaping
/// them, so markup hidden there would reach the page as-is. Outside of
/// iframes every `<` in serialized output starts a tag. Returns `None`
/// when there is no iframe.
fn strip_iframe_text(html: &str) -> Option<String> {
    const OPEN: &str = "<iframe";
    const CLOSE: &str = "</iframe>";
    if !html.contains(OPEN) {
        return None;
    }

    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        let Some(len) = tag_len(&rest[start..]) else {
            break;
        };
        let tag = &rest[start..start + len];
        out.push_str(&rest[..start + len]);
        rest = &rest[start + len..];

        let opens_iframe = tag
            .strip_prefix(OPEN)
            .is_some_and(|tail| tail.starts_with(|c: char| c == '>' || c.is_ascii_whitespace()));
        if opens_iframe {
            rest = rest.find(CLOSE).map_or("", |end| &rest[end..]);
        }
    }
    out.push_str(rest);
    Some(out)
}

/// Length of the tag starting at the front of `html`, quotes respected.
fn tag_len(html: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in html.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '>' if !quoted => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Attribute-level checks applied after the allow-lists.
///
/// Returning `None` drops the attribute.
fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    match attribute {
        "href" | "src" => match url_scheme(value).as_deref() {
            Some("data") if element == "img" && attribute == "src" && is_raster_data_uri(value) => {
                Some(Cow::Borrowed(value))
            }
            Some("data") => None,
            Some(scheme) if element == "iframe" && !matches!(scheme, "http" | "https") => None,
            _ => Some(Cow::Borrowed(value)),
        },
        "style" if has_unsafe_style(value) => None,
        _ => Some(Cow::Borrowed(value)),
    }
}
