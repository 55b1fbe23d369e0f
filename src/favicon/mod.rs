//! Favicon resolution, fetching, and caching.
//!
//! This module owns the pooled favicon path: deduplicate the domains behind
//! a batch of feed URLs, fan them across a bounded worker pool, resolve each
//! domain through a cascading candidate strategy (HTML `<link>` hints first,
//! conventional well-known paths second), and cache the first success as an
//! embeddable `data:` URL.
//!
//! The module is organized into four submodules:
//!
//! - [`FaviconFetcher`] (`fetcher`) - Batch orchestration and the per-domain
//!   candidate cascade
//! - `guard` - The validation envelope around every outbound icon GET
//! - `cache` - The read-mostly domain-to-data-URL map
//! - `domains` - Hostname extraction and deduplication

mod cache;
mod domains;
mod fetcher;
mod guard;

pub use cache::FaviconCache;
pub use domains::extract_unique_domains;
pub use fetcher::FaviconFetcher;
pub use guard::{fetch_icon, Icon, IconFetchError};
