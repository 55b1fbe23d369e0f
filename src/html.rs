//! Shared `<link>` tag scanning over parsed HTML documents.
//!
//! Both favicon discovery and feed discovery need the same traversal: walk
//! every element of an untrusted HTML document, pick out the `<link>` tags
//! that satisfy a predicate, and resolve their `href` against the page's
//! base URL. The predicate and the placement of each match are pluggable
//! through [`LinkMatcher`] so the two callers share one traversal.
//!
//! Parsing uses `scraper` (html5ever underneath), which recovers from
//! malformed markup instead of erroring - a garbage document simply yields
//! zero matches. Traversal is selector-driven and iterative, so pathological
//! nesting cannot blow the stack.

use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;
use url::Url;

/// Where a matched link lands in the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Prepend: pushes every earlier match further back. This is stack-like
    /// front-insertion, not a stable sort - a later high-priority match ends
    /// up ahead of an earlier one.
    Front,
    /// Append in document order.
    Back,
}

/// Decides whether a `<link>` element is a match and where it should land.
pub trait LinkMatcher {
    fn evaluate(&self, element: ElementRef<'_>) -> Option<Placement>;
}

/// Matches favicon-bearing `<link>` tags, prioritizing useful icon sizes.
pub struct FaviconMatcher;

/// `rel` values that indicate a favicon, compared case-insensitively.
const FAVICON_RELS: [&str; 5] = [
    "icon",
    "shortcut icon",
    "apple-touch-icon",
    "apple-touch-icon-precomposed",
    "mask-icon",
];

/// `sizes` substrings that indicate an icon worth trying first.
const PREFERRED_SIZES: [&str; 4] = ["32x32", "64x64", "128x128", "192x192"];

impl LinkMatcher for FaviconMatcher {
    fn evaluate(&self, element: ElementRef<'_>) -> Option<Placement> {
        let rel = element.value().attr("rel")?.to_lowercase();
        if !FAVICON_RELS.contains(&rel.as_str()) {
            return None;
        }

        let preferred = element
            .value()
            .attr("sizes")
            .is_some_and(|sizes| PREFERRED_SIZES.iter().any(|s| sizes.contains(s)));

        Some(if preferred {
            Placement::Front
        } else {
            Placement::Back
        })
    }
}

/// Matches `<link rel="alternate">` tags declaring an RSS or Atom feed.
pub struct FeedMatcher;

const FEED_TYPES: [&str; 2] = ["application/rss+xml", "application/atom+xml"];

impl LinkMatcher for FeedMatcher {
    fn evaluate(&self, element: ElementRef<'_>) -> Option<Placement> {
        let rel = element.value().attr("rel")?;
        let typ = element.value().attr("type")?;
        if rel == "alternate" && FEED_TYPES.contains(&typ) {
            Some(Placement::Back)
        } else {
            None
        }
    }
}

/// Scans a parsed document for matching `<link>` tags.
///
/// Every matching link's `href` is resolved against `base` to an absolute
/// URL; links whose `href` is missing or fails resolution are discarded.
/// Matches placed [`Placement::Front`] end up ahead of all earlier matches,
/// preserving a best-first ordering without a general sort.
pub fn scan_links(document: &Html, base: &Url, matcher: &dyn LinkMatcher) -> Vec<String> {
    // "link" is a valid selector, so this cannot fail at runtime
    let selector = Selector::parse("link").unwrap_or_else(|_| unreachable!());

    let mut links = VecDeque::new();
    for element in document.select(&selector) {
        let Some(placement) = matcher.evaluate(element) else {
            continue;
        };
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue;
        };

        match placement {
            Placement::Front => links.push_front(resolved.to_string()),
            Placement::Back => links.push_back(resolved.to_string()),
        }
    }

    links.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    fn scan(html: &str, matcher: &dyn LinkMatcher) -> Vec<String> {
        let document = Html::parse_document(html);
        scan_links(&document, &base(), matcher)
    }

    #[test]
    fn test_favicon_rel_variants_matched() {
        let html = r#"<head>
            <link rel="icon" href="/a.ico">
            <link rel="shortcut icon" href="/b.ico">
            <link rel="apple-touch-icon" href="/c.png">
            <link rel="apple-touch-icon-precomposed" href="/d.png">
            <link rel="mask-icon" href="/e.svg">
            <link rel="stylesheet" href="/style.css">
        </head>"#;
        let links = scan(html, &FaviconMatcher);
        assert_eq!(links.len(), 5);
        assert!(!links.iter().any(|l| l.contains("style.css")));
    }

    #[test]
    fn test_favicon_rel_case_insensitive() {
        let html = r#"<link rel="Shortcut Icon" href="/favicon.ico">"#;
        let links = scan(html, &FaviconMatcher);
        assert_eq!(links, vec!["https://example.com/favicon.ico"]);
    }

    #[test]
    fn test_sized_icon_prepended_over_earlier_match() {
        let html = r#"<head>
            <link rel="icon" href="/b.png">
            <link rel="icon" sizes="32x32" href="/a.png">
        </head>"#;
        let links = scan(html, &FaviconMatcher);
        assert_eq!(
            links,
            vec!["https://example.com/a.png", "https://example.com/b.png"]
        );
    }

    #[test]
    fn test_later_sized_icon_pushes_earlier_one_back() {
        // Front placement is a prepend, not a stable sort: the last sized
        // icon in document order comes out first.
        let html = r#"<head>
            <link rel="icon" sizes="32x32" href="/first.png">
            <link rel="icon" href="/plain.png">
            <link rel="icon" sizes="192x192" href="/second.png">
        </head>"#;
        let links = scan(html, &FaviconMatcher);
        assert_eq!(
            links,
            vec![
                "https://example.com/second.png",
                "https://example.com/first.png",
                "https://example.com/plain.png",
            ]
        );
    }

    #[test]
    fn test_unrecognized_sizes_appended() {
        let html = r#"<head>
            <link rel="icon" sizes="16x16" href="/tiny.png">
            <link rel="icon" sizes="any" href="/vector.svg">
        </head>"#;
        let links = scan(html, &FaviconMatcher);
        assert_eq!(
            links,
            vec![
                "https://example.com/tiny.png",
                "https://example.com/vector.svg",
            ]
        );
    }

    #[test]
    fn test_relative_href_resolved_against_base() {
        let document = Html::parse_document(r#"<link rel="icon" href="img/fav.ico">"#);
        let base = Url::parse("https://example.com/blog/").unwrap();
        let links = scan_links(&document, &base, &FaviconMatcher);
        assert_eq!(links, vec!["https://example.com/blog/img/fav.ico"]);
    }

    #[test]
    fn test_missing_href_discarded() {
        let html = r#"<link rel="icon">"#;
        assert!(scan(html, &FaviconMatcher).is_empty());
    }

    #[test]
    fn test_feed_links_in_document_order() {
        let html = r#"<head>
            <link rel="alternate" type="application/rss+xml" href="/feed.xml">
            <link rel="alternate" type="application/atom+xml" href="/atom.xml">
        </head>"#;
        let links = scan(html, &FeedMatcher);
        assert_eq!(
            links,
            vec![
                "https://example.com/feed.xml",
                "https://example.com/atom.xml",
            ]
        );
    }

    #[test]
    fn test_feed_matcher_requires_alternate_rel_and_feed_type() {
        let html = r#"<head>
            <link rel="alternate" type="text/html" href="/mobile">
            <link rel="stylesheet" type="application/rss+xml" href="/weird">
        </head>"#;
        assert!(scan(html, &FeedMatcher).is_empty());
    }

    #[test]
    fn test_links_found_outside_head() {
        // Malformed pages put <link> tags in the body; the scan covers the
        // whole tree, not just <head>.
        let html = r#"<body><div>
            <link rel="alternate" type="application/rss+xml" href="/feed.xml">
        </div></body>"#;
        let links = scan(html, &FeedMatcher);
        assert_eq!(links, vec!["https://example.com/feed.xml"]);
    }

    #[test]
    fn test_garbage_html_yields_no_matches() {
        assert!(scan("<<<>>>not html at all&&&", &FaviconMatcher).is_empty());
    }
}
