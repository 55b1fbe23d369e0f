//! Domain extraction from raw feed URLs.

use std::collections::HashSet;
use url::Url;

/// Extracts the unique hostnames from a list of raw URLs.
///
/// Feed URLs come from uncontrolled upstream sources and are expected to be
/// imperfect: entries that fail to parse, or parse without a host, are
/// silently discarded rather than treated as errors. Output order is
/// unspecified - downstream consumption through a worker pool makes it
/// irrelevant.
pub fn extract_unique_domains(urls: &[String]) -> Vec<String> {
    let mut domains = HashSet::new();

    for raw in urls {
        let Ok(parsed) = Url::parse(raw) else {
            continue;
        };
        if let Some(host) = parsed.host_str() {
            if !host.is_empty() {
                domains.insert(host.to_owned());
            }
        }
    }

    domains.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(urls: &[&str]) -> Vec<String> {
        let owned: Vec<String> = urls.iter().map(|s| s.to_string()).collect();
        let mut domains = extract_unique_domains(&owned);
        domains.sort();
        domains
    }

    #[test]
    fn test_deduplicates_hostnames() {
        let domains = extract(&[
            "https://example.com/feed.xml",
            "https://example.com/other.xml",
            "http://example.com/third",
        ]);
        assert_eq!(domains, vec!["example.com"]);
    }

    #[test]
    fn test_multiple_distinct_hosts() {
        let domains = extract(&["https://a.example/feed", "https://b.example/feed"]);
        assert_eq!(domains, vec!["a.example", "b.example"]);
    }

    #[test]
    fn test_malformed_urls_discarded() {
        let domains = extract(&[
            "not a url",
            "",
            "https://good.example/feed",
            "http://",
        ]);
        assert_eq!(domains, vec!["good.example"]);
    }

    #[test]
    fn test_hostless_urls_discarded() {
        // mailto: parses but carries no host component
        let domains = extract(&["mailto:user@example.com", "data:text/plain,hi"]);
        assert!(domains.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_unique_domains(&[]).is_empty());
    }
}
