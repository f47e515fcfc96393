//! Error Types

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the API client
///
/// Two kinds reach callers from the wire: [`ClientError::Status`] for a
/// non-success HTTP status, and transport-level failures
/// ([`ClientError::Network`], [`ClientError::InvalidResponse`],
/// [`ClientError::Cancelled`]). The client never retries; retry policy
/// belongs to the caller.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success HTTP status (outside [200, 300))
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport-level failure (connect, DNS, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not parseable as JSON
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Upload aborted via its cancellation token
    #[error("Upload cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file could not be read for upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status code, when this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_embeds_code() {
        let err = ClientError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("Service Unavailable"));
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_cancelled_message() {
        assert_eq!(ClientError::Cancelled.to_string(), "Upload cancelled");
        assert_eq!(ClientError::Cancelled.status(), None);
    }
}
