//! HTTP fetching of the news feed.
//!
//! One synchronous-in-spirit GET per run: no timeout, no retry, no
//! pagination. Transport failures, non-2xx statuses, and undecodable bodies
//! each map to their own [`FetchError`] variant; nothing is recovered here.
//! A 429 gets a rate-limit-specific log line before the same status error is
//! returned.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Conventional browser User-Agent; some news endpoints reject the default
/// library agent string.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Headers sent with the feed request when the caller has nothing special.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Perform a single GET against `url` and decode the body as JSON.
///
/// # Arguments
///
/// * `url` - The endpoint to request
/// * `headers` - Headers for the request; see [`default_headers`]
///
/// # Errors
///
/// * [`FetchError::Connect`] / [`FetchError::Timeout`] /
///   [`FetchError::Request`] for transport-level failures
/// * [`FetchError::Status`] for any non-2xx response
/// * [`FetchError::Decode`] when the body is not valid JSON
#[instrument(level = "info", skip_all)]
pub async fn fetch_feed(url: &str, headers: HeaderMap) -> Result<Value, FetchError> {
    info!("Sending HTTP request");

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "HTTP request failed");
            classify_transport_error(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(status = %status, "News API rate limit hit");
        }
        error!(status = %status, "HTTP error status");
        return Err(FetchError::Status { status });
    }
    info!(status = %status, "Received HTTP response");

    let content: Value = response.json().await.map_err(|e| {
        error!(error = %e, "Failed to decode response body as JSON");
        FetchError::Decode(e)
    })?;
    debug!(
        payload = %truncate_for_log(&content.to_string(), 300),
        "Decoded HTTP response"
    );

    Ok(content)
}

fn classify_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_connect() {
        FetchError::Connect(e)
    } else if e.is_timeout() {
        FetchError::Timeout(e)
    } else {
        FetchError::Request(e)
    }
}
