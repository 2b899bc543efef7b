//! Vehicle feed error types.

/// Errors from the live vehicle feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// No snapshot has been accepted yet
    #[error("vehicle snapshot not loaded")]
    NotLoaded,
}
