//! Guarded icon fetching.
//!
//! Every outbound GET for an icon candidate passes through one validation
//! envelope: a per-request timeout, a 2xx status requirement, a content-type
//! gate, and a hard size ceiling on the body. Callers do not branch on the
//! failure kind - any failure cascades to the next candidate - but the kinds
//! stay distinguishable for logging.

use crate::config::FetcherConfig;
use base64::{engine::general_purpose, Engine as _};
use futures::StreamExt;
use thiserror::Error;

/// User-Agent sent with every request from this subsystem.
pub(crate) const USER_AGENT: &str = concat!("emblem/", env!("CARGO_PKG_VERSION"), " favicon fetcher");

/// Errors from a single guarded icon fetch.
#[derive(Debug, Error)]
pub enum IconFetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Declared content type does not look like an image
    #[error("content type rejected: {0}")]
    ContentType(String),
    /// Response body was empty after reading
    #[error("empty response body")]
    EmptyBody,
}

/// A successfully fetched icon: raw bytes plus a resolved content type.
#[derive(Debug)]
pub struct Icon {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Icon {
    /// Encodes the icon as an embeddable `data:` URL.
    ///
    /// The exact `data:<mime>;base64,<payload>` shape is a compatibility
    /// requirement - downstream rendering embeds it directly into markup.
    pub fn to_data_url(&self) -> String {
        let encoded = general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.content_type, encoded)
    }
}

/// Performs one validated GET for an icon candidate.
///
/// Constraints are applied in order:
///
/// 1. Transport failure or timeout fails the fetch; no retry at this layer.
/// 2. The status must be 2xx.
/// 3. A present content-type must start with `image/`, or contain `icon` or
///    `octet-stream`. An absent header is treated as unknown, not rejected.
/// 4. The body is read up to `config.max_icon_size` bytes; anything beyond
///    the ceiling is silently truncated, but an empty body is a failure.
/// 5. If no content-type was declared, one is inferred from the URL's file
///    extension (`.png`, `.ico`, or `image/x-icon` as the fallback).
pub async fn fetch_icon(
    client: &reqwest::Client,
    icon_url: &str,
    config: &FetcherConfig,
) -> Result<Icon, IconFetchError> {
    // The deadline spans the whole call - connect, headers, and body read.
    // A server that sends headers then stalls the body cannot pin a worker.
    tokio::time::timeout(
        config.fetch_timeout,
        fetch_icon_unbounded(client, icon_url, config),
    )
    .await
    .map_err(|_| IconFetchError::Timeout)?
}

async fn fetch_icon_unbounded(
    client: &reqwest::Client,
    icon_url: &str,
    config: &FetcherConfig,
) -> Result<Icon, IconFetchError> {
    let response = client
        .get(icon_url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(IconFetchError::Network)?;

    if !response.status().is_success() {
        return Err(IconFetchError::HttpStatus(response.status().as_u16()));
    }

    let declared_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if let Some(ct) = &declared_type {
        if !looks_like_image(ct) {
            return Err(IconFetchError::ContentType(ct.clone()));
        }
    }

    let bytes = read_truncated_bytes(response, config.max_icon_size).await?;
    if bytes.is_empty() {
        return Err(IconFetchError::EmptyBody);
    }

    let content_type = declared_type.unwrap_or_else(|| infer_content_type(icon_url).to_owned());

    Ok(Icon {
        bytes,
        content_type,
    })
}

fn looks_like_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
        || content_type.contains("icon")
        || content_type.contains("octet-stream")
}

/// Infers a content type from the URL's file extension.
fn infer_content_type(icon_url: &str) -> &'static str {
    if icon_url.ends_with(".png") {
        "image/png"
    } else {
        // .ico and everything else
        "image/x-icon"
    }
}

/// Reads a response body, truncating at `limit` bytes.
///
/// Truncation is not an error: oversized icons keep their first `limit`
/// bytes. Reading stops as soon as the ceiling is reached, so a hostile
/// server cannot stream unboundedly.
async fn read_truncated_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, IconFetchError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(IconFetchError::Network)?;
        let remaining = limit - bytes.len();
        if chunk.len() >= remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            break;
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
