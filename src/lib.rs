//! Best-effort favicon resolution and feed-link discovery.
//!
//! This crate owns the resource discovery, fetch, and cache subsystem of an
//! RSS reader: it resolves a small favicon for each subscribed domain under
//! strict resource bounds (timeouts, size ceilings, content-type checks) and
//! caches the result as an embeddable `data:` URL, and it extracts RSS/Atom
//! `<link rel="alternate">` references from an arbitrary HTML page.
//!
//! # Architecture
//!
//! - [`favicon`] - Per-domain favicon resolution: domain deduplication, a
//!   bounded worker pool, a cascading candidate strategy (HTML hints first,
//!   conventional well-known paths second), and a read-mostly cache.
//! - [`feed`] - Synchronous feed-link discovery for a single page.
//! - [`html`] - Shared `<link>` tag scanning with pluggable matchers.
//! - [`config`] - Resource-bound configuration (pool size, timeout, ceiling).
//!
//! # Example
//!
//! ```no_run
//! use emblem::favicon::FaviconFetcher;
//!
//! # async fn demo(feed_urls: Vec<String>) {
//! let fetcher = FaviconFetcher::default();
//! fetcher.fetch_favicons_for_domains(&feed_urls).await;
//!
//! if let Some(data_url) = fetcher.favicon_data_url("example.com") {
//!     // embed directly into markup
//!     println!("<img src=\"{data_url}\">");
//! }
//! # }
//! ```

pub mod config;
pub mod favicon;
pub mod feed;
pub mod html;
