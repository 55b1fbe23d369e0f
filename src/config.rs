//! Resource-bound configuration for the favicon fetcher.
//!
//! All bounds default to the values the subsystem was tuned for; any subset
//! of keys can be overridden when deserializing from an application config
//! file. The pool size and per-request timeout together bound total batch
//! latency at `ceil(domains / max_workers) * per-domain worst case`.
use serde::Deserialize;
use std::time::Duration;

/// Resource bounds applied to every favicon batch.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Number of concurrent workers draining the domain queue.
    pub max_workers: usize,

    /// Per-request timeout in seconds, applied to the HTML discovery fetch
    /// and to each icon candidate fetch independently.
    #[serde(rename = "fetch_timeout_secs", deserialize_with = "secs_to_duration")]
    pub fetch_timeout: Duration,

    /// Hard ceiling on an icon body, in bytes. Longer bodies are truncated
    /// at the ceiling, not rejected.
    pub max_icon_size: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            fetch_timeout: Duration::from_secs(10),
            max_icon_size: 1_048_576, // 1MB
        }
    }
}

fn secs_to_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}
