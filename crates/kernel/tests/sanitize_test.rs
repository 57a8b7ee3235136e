#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Sanitizer property and regression tests.

use proptest::prelude::*;

use inkpress_kernel::content::{
    Profile, SanitizationProfile, Sanitizer, is_safe_url, sanitize,
};
use inkpress_test_utils::{assert, bodies};

/// Balanced fragments mixing allowed markup, hostile markup and text.
const FRAGMENTS: &[&str] = &[
    "plain words ",
    "Tom & Jerry ",
    "a < b > c ",
    "<p>para</p>",
    "<h2>Heading</h2>",
    "<strong>bold</strong>",
    "<em>it</em>",
    "<b>",
    "</b>",
    "<ul><li>one</li><li>two</li></ul>",
    "<blockquote>quote</blockquote>",
    "<code>x = 1</code>",
    "<div class=\"note\" data-id=\"7\">note</div>",
    "<span style=\"color: red\">red</span>",
    "<span style=\"background: url(javascript:alert(1))\">bg</span>",
    "<a href=\"https://example.com\" title=\"t\">link</a>",
    "<a href=\"/relative/path\">rel</a>",
    "<a href=\"javascript:alert(1)\">js</a>",
    "<a href=\"JaVaScRiPt:alert(1)\">js2</a>",
    "<a href=\"data:text/html,<script>alert(1)</script>\">data</a>",
    "<img src=\"x\" onerror=\"alert(1)\">",
    "<img src=\"data:image/png;base64,iVBORw0KGgo=\" alt=\"dot\">",
    "<img src=\"data:image/svg+xml;base64,PHN2Zz4=\">",
    "<p onclick=\"steal()\">click me</p>",
    "<script>alert(document.cookie)</script>",
    "<style>body { display: none }</style>",
    "<!-- hidden comment -->",
    "<iframe src=\"https://www.youtube.com/embed/abc\" allowfullscreen></iframe>",
    "<iframe src=\"javascript:alert(1)\"></iframe>",
    "<svg onload=\"alert(1)\"></svg>",
    "<object data=\"evil.swf\"></object>",
    "<form action=\"/x\"><input name=\"q\"></form>",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..12)
        .prop_map(|parts| parts.concat())
}

/// Tags opened and closed at random, allowed and disallowed alike.
const SOUP_TAGS: &[&str] = &[
    "p", "b", "strong", "em", "a", "ul", "ol", "li", "h2", "blockquote", "pre", "code", "div",
    "span", "table", "tr", "td", "img", "br", "iframe", "select", "option", "template", "svg",
    "math", "noscript", "textarea", "style", "script", "form",
];

/// Unbalanced markup: stray open and close tags between fragments and text.
fn tag_soup() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        prop::sample::select(SOUP_TAGS).prop_map(|tag| format!("<{tag}>")),
        prop::sample::select(SOUP_TAGS).prop_map(|tag| format!("</{tag}>")),
        prop::sample::select(FRAGMENTS).prop_map(str::to_string),
        "[a-z &<>]{0,8}",
    ];
    prop::collection::vec(piece, 0..16).prop_map(|parts| parts.concat())
}

/// Arbitrary strings over the characters markup is made of.
fn free_form() -> impl Strategy<Value = String> {
    "[<>/=\"' a-z&;!-]{0,64}"
}

fn profile() -> impl Strategy<Value = Profile> {
    prop_oneof![Just(Profile::Rich), Just(Profile::PlainText)]
}

proptest! {
    #[test]
    fn prop_sanitize_is_idempotent(doc in document(), profile in profile()) {
        let once = sanitize(&doc, profile);
        let twice = sanitize(once.as_str(), profile);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_no_script_survives(doc in document(), profile in profile()) {
        let out = sanitize(&doc, profile).into_string().to_ascii_lowercase();
        prop_assert!(!out.contains("<script"), "script tag in {}", out);
        prop_assert!(!out.contains("onerror="), "onerror in {}", out);
        prop_assert!(!out.contains("onclick="), "onclick in {}", out);
        prop_assert!(!out.contains("onload="), "onload in {}", out);
        prop_assert!(!out.contains("javascript:"), "javascript uri in {}", out);
    }

    #[test]
    fn prop_plain_text_has_no_tags(doc in document()) {
        let out = sanitize(&doc, Profile::PlainText);
        prop_assert!(!out.as_str().contains('<'), "tag in {}", out);
    }

    #[test]
    fn prop_tag_soup_is_idempotent(doc in tag_soup(), profile in profile()) {
        let once = sanitize(&doc, profile);
        let twice = sanitize(once.as_str(), profile);
        prop_assert_eq!(once, twice, "input: {}", doc);
    }

    #[test]
    fn prop_tag_soup_has_no_script(doc in tag_soup(), profile in profile()) {
        let out = sanitize(&doc, profile).into_string().to_ascii_lowercase();
        prop_assert!(!out.contains("<script"), "script tag in {} from {}", out, doc);
        prop_assert!(!out.contains("onerror="), "onerror in {} from {}", out, doc);
        prop_assert!(!out.contains("onclick="), "onclick in {} from {}", out, doc);
        prop_assert!(!out.contains("onload="), "onload in {} from {}", out, doc);
        prop_assert!(!out.contains("javascript:"), "javascript uri in {} from {}", out, doc);
    }

    #[test]
    fn prop_tag_soup_plain_text_has_no_tags(doc in tag_soup()) {
        let out = sanitize(&doc, Profile::PlainText);
        prop_assert!(!out.as_str().contains('<'), "tag in {} from {}", out, doc);
    }

    #[test]
    fn prop_free_form_is_idempotent(doc in free_form(), profile in profile()) {
        let once = sanitize(&doc, profile);
        let twice = sanitize(once.as_str(), profile);
        prop_assert_eq!(once, twice, "input: {:?}", doc);
    }

    #[test]
    fn prop_free_form_plain_text_has_no_tags(doc in free_form()) {
        let out = sanitize(&doc, Profile::PlainText);
        prop_assert!(!out.as_str().contains('<'), "tag in {} from {:?}", out, doc);
    }
}

#[test]
fn plain_text_strips_bold() {
    assert_eq!(sanitize("<b>x</b>", Profile::PlainText).as_str(), "x");
}

#[test]
fn malicious_fixture_is_neutralized() {
    let out = sanitize(bodies::MALICIOUS_HTML, Profile::Rich);
    assert::no_script(out.as_str());
    assert::contains(out.as_str(), "<p>Hi</p>");
    assert::contains(out.as_str(), "<a>click</a>");
}

#[test]
fn embed_fixture_survives() {
    let out = sanitize(bodies::HTML, Profile::Rich);
    assert::contains(out.as_str(), "<h2>Demo</h2>");
    assert::contains(out.as_str(), "src=\"https://www.youtube.com/embed/abc123\"");
    assert::contains(out.as_str(), "allowfullscreen");
}

#[test]
fn custom_profile_engine() {
    let profile = SanitizationProfile::new("links_only")
        .with_tags(&["a"])
        .with_attributes(&["href"])
        .with_url_schemes(&["https"]);
    let sanitizer = Sanitizer::new(profile);

    assert_eq!(sanitizer.profile().name(), "links_only");
    assert_eq!(
        sanitizer
            .clean("<p><a href=\"https://a.example\" class=\"x\">a</a> <a href=\"http://b.example\">b</a></p>")
            .as_str(),
        "<a href=\"https://a.example\">a</a> <a>b</a>"
    );
}

#[test]
fn navigation_url_checks() {
    assert!(is_safe_url("https://example.com/post"));
    assert!(is_safe_url("/blog/next"));
    assert!(!is_safe_url("javascript:alert(1)"));
    assert!(!is_safe_url("//evil.example"));
    assert!(!is_safe_url("/\\evil.example/x"));
    assert!(!is_safe_url("\\/evil.example/x"));
    assert!(!is_safe_url("/\t/evil.example/x"));
    assert!(!is_safe_url(""));
}

#[test]
fn select_inside_paragraph_settles() {
    for profile in [Profile::Rich, Profile::PlainText] {
        let once = sanitize("<p><select><p>", profile);
        assert_eq!(sanitize(once.as_str(), profile), once);
    }
}
