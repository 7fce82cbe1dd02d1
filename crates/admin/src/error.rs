//! Admin API error types.

use thiserror::Error;

/// Errors that can occur when calling the admin API.
#[derive(Debug, Error)]
pub enum AdminError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("admin API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product draft was rejected before sending.
    #[error("invalid product: {0}")]
    InvalidDraft(String),

    /// The configured base URL cannot carry a path.
    #[error("invalid admin API URL: {0}")]
    InvalidUrl(String),
}
