//! Per-domain favicon resolution and the batch worker pool.
//!
//! Resolution for one domain is a fixed cascade: fetch the domain's landing
//! page and scan it for favicon `<link>` hints, then try each candidate URL
//! (hints first, conventional well-known paths second) through the fetch
//! guard until one yields usable bytes. The first success is encoded as a
//! `data:` URL and cached; a domain whose every candidate fails leaves no
//! cache entry and is simply logged.
//!
//! Batches fan the deduplicated domain set across a bounded pool of
//! concurrent workers. The batch call resumes only after every worker has
//! drained its share, so from the caller's point of view it is a synchronous
//! operation over the whole set.

use crate::config::FetcherConfig;
use crate::favicon::cache::FaviconCache;
use crate::favicon::domains::extract_unique_domains;
use crate::favicon::guard::{fetch_icon, USER_AGENT};
use crate::html::{scan_links, FaviconMatcher};
use futures::stream::{self, StreamExt};
use scraper::Html;
use url::Url;

/// Ceiling on a landing page read during HTML hint discovery (5MB).
const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024;

/// Well-known icon paths tried after any HTML-discovered hints, in order.
const CONVENTIONAL_PATHS: [&str; 4] = [
    "/favicon.ico",
    "/favicon.png",
    "/apple-touch-icon.png",
    "/apple-touch-icon-precomposed.png",
];

/// Resolves and caches favicons for feed domains.
///
/// Owns the result cache and a shared HTTP client. The cache is the only
/// state shared across workers; all mutation passes through its lock, and
/// workers hold nothing beyond the single domain they are processing.
#[derive(Debug)]
pub struct FaviconFetcher {
    cache: FaviconCache,
    client: reqwest::Client,
    config: FetcherConfig,
}

impl Default for FaviconFetcher {
    fn default() -> Self {
        Self::new(FetcherConfig::default())
    }
}

impl FaviconFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            cache: FaviconCache::new(),
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Returns the cached data URL for a domain, if one has been resolved.
    ///
    /// Lock-only; never touches the network. `None` means either "not yet
    /// attempted" or "attempted and failed" - callers render no icon.
    pub fn favicon_data_url(&self, domain: &str) -> Option<String> {
        self.cache.get(domain)
    }

    /// Resolves favicons for every unique domain in a batch of feed URLs.
    ///
    /// Malformed URLs are discarded, duplicate hostnames collapse to one
    /// job, and domains with a cached favicon are skipped entirely. The
    /// remaining domains are fanned across `config.max_workers` concurrent
    /// workers; the call returns only after the whole batch has drained.
    ///
    /// Failures are internal: a domain that cannot be resolved is logged
    /// and left out of the cache, and the batch always completes.
    pub async fn fetch_favicons_for_domains(&self, feed_urls: &[String]) {
        let pending: Vec<String> = extract_unique_domains(feed_urls)
            .into_iter()
            .filter(|domain| !self.cache.contains(domain))
            .collect();

        tracing::info!(domains = pending.len(), "starting favicon batch");

        // Fixed https scheme: feeds on plain-http hosts get no icon rather
        // than an unencrypted fetch.
        let jobs: Vec<(String, Url)> = pending
            .into_iter()
            .filter_map(|domain| {
                let origin = Url::parse(&format!("https://{domain}/")).ok()?;
                Some((domain, origin))
            })
            .collect();

        self.resolve_all(jobs).await;

        tracing::info!(cached = self.cache.len(), "finished favicon batch");
    }

    /// Fans resolution jobs across the bounded worker pool and waits for
    /// all of them.
    async fn resolve_all(&self, jobs: Vec<(String, Url)>) {
        stream::iter(jobs)
            .map(|(domain, origin)| async move {
                self.resolve_for_origin(&domain, &origin).await;
            })
            .buffer_unordered(self.config.max_workers.max(1))
            .collect::<Vec<_>>()
            .await;
    }

    /// Runs the candidate cascade for one domain rooted at `origin`.
    ///
    /// Returns whether a favicon was resolved and cached.
    async fn resolve_for_origin(&self, domain: &str, origin: &Url) -> bool {
        let mut candidates = self.discover_icon_urls(origin).await;
        for well_known in CONVENTIONAL_PATHS {
            if let Ok(fallback) = origin.join(well_known) {
                candidates.push(fallback.to_string());
            }
        }

        for candidate in &candidates {
            match fetch_icon(&self.client, candidate, &self.config).await {
                Ok(icon) => {
                    tracing::debug!(
                        domain = domain,
                        candidate = candidate,
                        size = icon.bytes.len(),
                        content_type = %icon.content_type,
                        "favicon resolved"
                    );
                    self.cache.insert_if_absent(domain, icon.to_data_url());
                    return true;
                }
                Err(e) => {
                    tracing::debug!(
                        domain = domain,
                        candidate = candidate,
                        error = %e,
                        "icon candidate failed"
                    );
                }
            }
        }

        tracing::info!(domain = domain, "no favicon found");
        false
    }

    /// Fetches the landing page and scans it for favicon `<link>` hints.
    ///
    /// Any failure here - network, non-2xx, oversized page - yields an
    /// empty hint list, not an error: the conventional paths still get
    /// their chance.
    async fn discover_icon_urls(&self, origin: &Url) -> Vec<String> {
        // The deadline covers the body read as well as the headers, so a
        // stalling landing page costs at most one timeout, not a worker.
        let bytes = match tokio::time::timeout(
            self.config.fetch_timeout,
            self.fetch_hint_page(origin),
        )
        .await
        {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(_) => {
                tracing::debug!(origin = %origin, "hint page fetch timed out");
                return Vec::new();
            }
        };

        scan_page_for_icons(&String::from_utf8_lossy(&bytes), origin)
    }

    async fn fetch_hint_page(&self, origin: &Url) -> Option<Vec<u8>> {
        let response = match self
            .client
            .get(origin.clone())
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(origin = %origin, error = %e, "hint page fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(origin = %origin, status = %response.status(), "hint page returned error status");
            return None;
        }

        read_page_bytes(response).await
    }
}

/// Parses page text and extracts priority-ordered favicon hint URLs.
///
/// Synchronous on purpose: the parsed document is not `Send` and must not
/// live across an await point.
fn scan_page_for_icons(page: &str, origin: &Url) -> Vec<String> {
    let document = Html::parse_document(page);
    scan_links(&document, origin, &FaviconMatcher)
}

/// Reads a page body, giving up past [`MAX_PAGE_SIZE`].
async fn read_page_bytes(response: reqwest::Response) -> Option<Vec<u8>> {
    if let Some(len) = response.content_length() {
        if len as usize > MAX_PAGE_SIZE {
            return None;
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.ok()?;
        if bytes.len().saturating_add(chunk.len()) > MAX_PAGE_SIZE {
            return None;
        }
        bytes.extend_from_slice(&chunk);
    }

    Some(bytes)
}
