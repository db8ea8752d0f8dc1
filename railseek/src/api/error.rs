//! Query client error types.

/// Errors from the upstream HTTP client.
///
/// Transport and decode failures are treated identically by the
/// caller: retried with backoff, then degraded to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status code.
    #[error("API error {status}")]
    Status { status: u16 },

    /// Response body did not decode to the expected shape.
    #[error("decode error: {message} (body: {snippet})")]
    Decode { message: String, snippet: String },

    /// The client is shutting down.
    #[error("client closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::Status { status: 503 };
        assert_eq!(err.to_string(), "API error 503");

        let err = ApiError::Decode {
            message: "expected value".into(),
            snippet: "<html>".into(),
        };
        assert!(err.to_string().contains("decode error"));
        assert!(err.to_string().contains("<html>"));
    }
}
