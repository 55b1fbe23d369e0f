//! Synchronous feed-link discovery for a single page.
//!
//! Unlike the pooled favicon path, discovery runs once per user-submitted
//! URL and returns its findings directly: fetch the page, scan its `<link
//! rel="alternate">` tags for RSS/Atom types, and hand back the absolute
//! feed URLs in document order. No caching, no cascade, no fallback paths.

use crate::html::{scan_links, FeedMatcher};
use futures::StreamExt;
use scraper::Html;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Errors from feed-link discovery, one per user-visible failure stage.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The URL could not be parsed or uses a scheme other than http/https
    #[error("invalid URL: {0} (only http/https allowed)")]
    InvalidUrl(String),
    /// HTTP request failed (DNS, connection, TLS, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 10-second timeout
    #[error("request timed out")]
    Timeout,
    /// Non-2xx status from the site
    #[error("non-2xx status from site: {0}")]
    BadStatus(u16),
    /// Response body exceeded the 5MB size limit
    #[error("response too large")]
    TooLarge,
    /// The response body could not be decoded as an HTML page
    #[error("failed to parse HTML: {0}")]
    Parse(String),
}

/// Discovers RSS/Atom feed links advertised by an HTML page.
///
/// Fetches `page_url` (http/https only, rejected before any network I/O)
/// with a 10-second timeout, parses the HTML, and returns every
/// `<link rel="alternate">` whose declared type is `application/rss+xml`
/// or `application/atom+xml`, resolved to absolute URLs in document order.
/// An empty list is a valid outcome, not an error.
///
/// # Errors
///
/// Returns [`DiscoveryError`] naming the stage that failed: scheme
/// rejected, fetch failed, bad status, or parse failed.
pub async fn discover_feed_links(
    client: &reqwest::Client,
    page_url: &str,
) -> Result<Vec<String>, DiscoveryError> {
    discover_with_deadline(client, page_url, DISCOVERY_TIMEOUT).await
}

/// Discovery with an explicit deadline spanning the whole fetch - connect,
/// headers, and body read - so a stalling server cannot hang the caller.
async fn discover_with_deadline(
    client: &reqwest::Client,
    page_url: &str,
    deadline: Duration,
) -> Result<Vec<String>, DiscoveryError> {
    let base = Url::parse(page_url).map_err(|e| DiscoveryError::InvalidUrl(e.to_string()))?;
    match base.scheme() {
        "http" | "https" => {}
        scheme => return Err(DiscoveryError::InvalidUrl(scheme.to_owned())),
    }

    let bytes = tokio::time::timeout(deadline, fetch_page(client, &base))
        .await
        .map_err(|_| DiscoveryError::Timeout)??;

    let page = String::from_utf8(bytes)
        .map_err(|e| DiscoveryError::Parse(format!("page is not valid UTF-8: {e}")))?;

    Ok(scan_page_for_feeds(&page, &base))
}

/// Fetches the page body; the caller supplies the deadline.
async fn fetch_page(client: &reqwest::Client, base: &Url) -> Result<Vec<u8>, DiscoveryError> {
    let response = client.get(base.clone()).send().await?;

    if !response.status().is_success() {
        return Err(DiscoveryError::BadStatus(response.status().as_u16()));
    }

    read_page_bytes(response).await
}

/// Parses page text and extracts feed link URLs.
///
/// Synchronous on purpose: the parsed document is not `Send` and must not
/// live across an await point.
fn scan_page_for_feeds(page: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(page);
    scan_links(&document, base, &FeedMatcher)
}

/// Reads the page body with a 5MB ceiling using stream-based reading.
async fn read_page_bytes(response: reqwest::Response) -> Result<Vec<u8>, DiscoveryError> {
    if let Some(len) = response.content_length() {
        if len as usize > MAX_PAGE_SIZE {
            return Err(DiscoveryError::TooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(DiscoveryError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > MAX_PAGE_SIZE {
            return Err(DiscoveryError::TooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
