//! In-process favicon cache.
//!
//! A concurrent, read-mostly mapping from bare domain to the resolved
//! `data:` URL. Page renders hit `get` constantly while batches write
//! rarely, so the map sits behind a reader/writer lock: concurrent readers
//! never block each other, and a write blocks everyone only for the length
//! of one map insert.
//!
//! There is no eviction, TTL, or capacity bound - the cache grows with the
//! number of distinct domains resolved over the process lifetime, and the
//! first value stored for a domain is the value for good. Absence of a key
//! means "not yet attempted" or "attempted and failed"; the cache does not
//! distinguish the two.

use std::collections::HashMap;
use std::sync::RwLock;

/// Maps domain names to base64 `data:` URLs.
#[derive(Debug, Default)]
pub struct FaviconCache {
    entries: RwLock<HashMap<String, String>>,
}

impl FaviconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached data URL for a domain, if one has been resolved.
    ///
    /// Takes the read lock only; never touches the network.
    pub fn get(&self, domain: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(domain).cloned()
    }

    /// Returns whether a domain already has a cached value.
    pub fn contains(&self, domain: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(domain)
    }

    /// Stores a data URL for a domain unless one is already present.
    ///
    /// First success wins: a cached value is immutable for the process
    /// lifetime, so re-resolving a domain can never change what renders.
    pub fn insert_if_absent(&self, domain: &str, data_url: String) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(domain.to_owned()).or_insert(data_url);
    }

    /// Number of domains with a cached favicon.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_domain() {
        let cache = FaviconCache::new();
        assert_eq!(cache.get("example.com"), None);
        assert!(!cache.contains("example.com"));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = FaviconCache::new();
        cache.insert_if_absent("example.com", "data:image/png;base64,AAAA".into());
        assert_eq!(
            cache.get("example.com").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_value_wins() {
        let cache = FaviconCache::new();
        cache.insert_if_absent("example.com", "data:image/png;base64,FIRST".into());
        cache.insert_if_absent("example.com", "data:image/png;base64,SECOND".into());
        assert_eq!(
            cache.get("example.com").as_deref(),
            Some("data:image/png;base64,FIRST")
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        use std::sync::Arc;

        let cache = Arc::new(FaviconCache::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                let domain = format!("site{i}.example");
                cache.insert_if_absent(&domain, format!("data:image/x-icon;base64,{i}"));
                for j in 0..8 {
                    let _ = cache.get(&format!("site{j}.example"));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
    }
}
