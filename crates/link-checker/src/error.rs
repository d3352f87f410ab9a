//! Error types for link-checker

use thiserror::Error;

/// Errors surfaced by a link-check run.
///
/// Probe failures never appear here; they are folded into a
/// `(0, message)` result per URL.
#[derive(Error, Debug)]
pub enum LinkCheckError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client could not be constructed or a request failed outright
    #[error("HTTP error: {0}")]
    Http(String),

    /// Issue tracker rejected a request
    #[error("Issue API error for {url}: {reason}")]
    Issue { url: String, reason: String },

    /// Issue filing requested without a token
    #[error("GITHUB_TOKEN is not set")]
    MissingToken,
}

impl From<reqwest::Error> for LinkCheckError {
    fn from(err: reqwest::Error) -> Self {
        LinkCheckError::Http(err.to_string())
    }
}
