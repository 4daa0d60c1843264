//! Document fetching.
//!
//! One blocking GET per call: no retries, no caching, no redirect handling
//! beyond what the transport performs transparently. Input constraints are
//! checked before any I/O so a bad URL or timeout never touches the network.

use std::time::{Duration, Instant};

use url::Url;

use crate::error::{Error, Result};

/// A fetched response: raw body bytes and the numeric status code. The body
/// is never interpreted here; content-type is the caller's concern.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub status: u16,
}

/// Issue a single blocking HTTP GET.
///
/// `url` must be an absolute http or https URL and `timeout` must be
/// positive, else [`Error::Request`]. Transport failures (DNS, connect,
/// timeout, body read) are [`Error::Network`]; a non-2xx response is
/// [`Error::HttpStatus`], leaving the caller to decide whether that is
/// fatal.
pub fn fetch(url: &str, timeout: Duration) -> Result<Fetched> {
    if timeout.is_zero() {
        return Err(Error::Request("timeout must be positive".into()));
    }

    let parsed = Url::parse(url).map_err(|e| Error::Request(format!("invalid URL {url:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Request(format!(
            "unsupported URL scheme {:?}",
            parsed.scheme()
        )));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Network(e.to_string()))?;

    tracing::debug!(
        url = %parsed,
        timeout_ms = timeout.as_millis() as u64,
        "fetch.start"
    );

    let t0 = Instant::now();
    let response = client
        .get(parsed)
        .send()
        .map_err(|e| Error::Network(e.to_string()))?;
    let status = response.status();

    if !status.is_success() {
        tracing::debug!(
            status = status.as_u16(),
            duration_ms = t0.elapsed().as_millis() as u64,
            "fetch.status_error"
        );
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response
        .bytes()
        .map_err(|e| Error::Network(e.to_string()))?;

    tracing::debug!(
        status = status.as_u16(),
        duration_ms = t0.elapsed().as_millis() as u64,
        body_len = bytes.len(),
        "fetch.done"
    );

    Ok(Fetched {
        bytes: bytes.to_vec(),
        status: status.as_u16(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_timeout() {
        let err = fetch("http://example.com/", Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }

    #[test]
    fn test_rejects_relative_url() {
        let err = fetch("/just/a/path", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = fetch("ftp://example.com/data.csv", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }
}
