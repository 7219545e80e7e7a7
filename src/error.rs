use thiserror::Error;

/// Typed outcome of a single API request.
///
/// The orchestrator is the only place these are translated into user-facing
/// text; everything below it keeps the structured variant intact.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request exceeded the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// Network-level failure: connection refused, DNS failure, unreachable.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response. Carries the body's `detail` field verbatim when
    /// present, otherwise "API Error: <status>".
    #[error("{0}")]
    Server(String),

    /// A 2xx response whose body could not be parsed as the expected JSON.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Invalid base URL or endpoint path.
    #[error("Invalid URL: {0}")]
    BaseUrl(String),
}

impl ClientError {
    /// Whether the service itself answered (as opposed to being unreachable
    /// or silent).
    pub fn is_server_reported(&self) -> bool {
        matches!(self, ClientError::Server(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_detail_verbatim() {
        let err = ClientError::Server("Error during prediction: bad input".to_string());
        assert_eq!(err.to_string(), "Error during prediction: bad input");
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(ClientError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn test_is_server_reported() {
        assert!(ClientError::Server("x".into()).is_server_reported());
        assert!(!ClientError::Timeout.is_server_reported());
        assert!(!ClientError::Network("refused".into()).is_server_reported());
    }
}
