//! Routing client error types.

/// Errors from the routing HTTP client.
///
/// These never leave the routing module through `RouteFetcher`; they are
/// logged and turned into `None`.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Service answered but found no route
    #[error("no route ({code}): {message}")]
    NoRoute { code: String, message: String },
}
