// src/page/links.rs
// =============================================================================
// This module extracts crawlable links from HTML pages.
//
// We use the `scraper` crate to find every <a href> in the markup, and the
// `url` crate to:
// - Resolve relative links against the page they were found on
// - Normalize every link so the same page always has the same string
//
// Normalization matters because the crawler uses the URL string as the page's
// identity. "https://Example.com//docs#intro" and "https://example.com/docs"
// must end up as the same key in the visited set.
// =============================================================================

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::LinkError;

// Extracts all crawlable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links)
//
// Returns: normalized absolute http/https URLs, in the order they appear in
// the markup. Duplicates are kept; the visited set collapses them later.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        // Same-page jump links point back at the page we're on
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        match normalize_link(page_url, href) {
            Ok(link) => links.push(link),
            Err(e) => debug!(page = %page_url, "dropping link: {e}"),
        }
    }

    links
}

// Resolves a possibly-relative href against its page and normalizes it
//
// Examples (page = "https://example.com/page/"):
//   "/docs"                  -> "https://example.com/docs"
//   "../about"               -> "https://example.com/about"
//   "HTTPS://Other.COM//a#b" -> "https://other.com/a"
//   "mailto:me@example.com"  -> Err(UnsupportedScheme)
pub fn normalize_link(page_url: &Url, href: &str) -> Result<String, LinkError> {
    // join() handles both cases: absolute hrefs replace the base entirely
    let resolved = page_url
        .join(href.trim())
        .map_err(|source| LinkError::Unparseable {
            href: href.to_string(),
            source,
        })?;

    if !is_crawlable(&resolved) {
        return Err(LinkError::UnsupportedScheme(resolved.scheme().to_string()));
    }

    Ok(normalize_url(resolved).to_string())
}

/// Puts an absolute URL into the canonical form used as page identity.
///
/// Parsing already lowercases the scheme and host and drops default ports.
/// On top of that we strip the fragment, drop an empty `?`, and collapse
/// repeated `/` in the path.
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    let collapsed = collapse_slashes(url.path());
    if collapsed != url.path() {
        url.set_path(&collapsed);
    }

    url
}

/// Only http and https pages can be crawled
pub fn is_crawlable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;

    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }

    out
}
