//! Feed-link discovery for user-submitted pages.

mod discovery;

pub use discovery::{discover_feed_links, DiscoveryError};
