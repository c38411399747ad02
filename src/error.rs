//! Error types for each stage of the digest pipeline.
//!
//! Every stage owns a small enum: nothing is recovered locally, errors are
//! logged where they occur and propagated with `?` until `main` terminates
//! the run. The only non-error terminal state is an empty digest, which is
//! represented as an empty string, not an error.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while fetching and decoding the news feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS failure or connection refused.
    #[error("connection error: {0}")]
    Connect(#[source] reqwest::Error),

    /// The request timed out at the transport layer.
    #[error("timeout error: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Any other transport-level request failure.
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: server returned status {status}")]
    Status { status: StatusCode },

    /// The response body was not valid JSON.
    #[error("decode error: response body is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Failures while validating and formatting the article feed.
///
/// The first four variants are shape errors (missing keys or wrong container
/// types); `FieldNotAString` is a field-type error. Missing-key and
/// wrong-type cases carry distinct messages but share the fail-fast policy:
/// any of these aborts the whole format call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("key 'articles' is missing from the feed")]
    MissingArticlesKey,

    #[error("value of 'articles' must be an array of objects")]
    ArticlesNotAnArray,

    #[error("article at position {0} is not an object")]
    ArticleNotAnObject(usize),

    #[error("article at position {0} must contain 'title', 'description' and 'url' keys")]
    MissingArticleField(usize),

    #[error("article at position {0}: 'title', 'description' and 'url' must be strings")]
    FieldNotAString(usize),
}

impl DigestError {
    /// Whether this is a shape error (missing key / wrong container type)
    /// as opposed to a field-type error.
    pub fn is_shape(&self) -> bool {
        !matches!(self, DigestError::FieldNotAString(_))
    }
}

/// Failures while composing or transmitting the email.
#[derive(Debug, Error)]
pub enum MailError {
    /// An address failed the RFC-lite pattern check. This is a precondition
    /// violation, distinguishable from transport errors.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message envelope could not be built.
    #[error("failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),

    /// TLS setup for the SMTP connection failed. Fatal, never retried.
    #[error("TLS setup error: {0}")]
    Tls(#[source] lettre::transport::smtp::Error),

    /// The SMTP server rejected the credentials.
    #[error("SMTP authentication failed: {0}")]
    Auth(#[source] lettre::transport::smtp::Error),

    /// Could not reach the SMTP server.
    #[error("unable to connect to SMTP server: {0}")]
    Connect(#[source] lettre::transport::smtp::Error),

    /// Any other SMTP-level failure.
    #[error("SMTP error: {0}")]
    Smtp(#[source] lettre::transport::smtp::Error),
}

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NEWS_API_KEY is required when no --endpoint is given")]
    MissingApiKey,
}
