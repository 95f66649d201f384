//! Error types for LLM client operations.

use std::time::Duration;

/// Classification of an LLM request failure.
///
/// Callers use the kind to decide whether an attempt is worth retrying:
/// network problems, rate limits and provider-side errors are transient,
/// client errors (bad request, bad key) are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Connection failure or timeout before a response arrived.
    Network,
    /// Provider returned 429.
    RateLimited,
    /// Provider returned 5xx.
    ServerError,
    /// Provider rejected the request (4xx other than 429).
    ClientError,
    /// Response arrived but its envelope could not be decoded.
    Parse,
}

impl std::fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LlmErrorKind::Network => "network",
            LlmErrorKind::RateLimited => "rate_limited",
            LlmErrorKind::ServerError => "server_error",
            LlmErrorKind::ClientError => "client_error",
            LlmErrorKind::Parse => "parse",
        };
        f.write_str(name)
    }
}

/// Error from an LLM request, carrying its classification.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
    /// HTTP status, when the provider responded at all.
    pub status: Option<u16>,
    /// Provider-suggested pause from a Retry-After header.
    pub retry_after: Option<Duration>,
}

impl LlmError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::Network,
            message: message.into(),
            status: None,
            retry_after: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self {
            kind: LlmErrorKind::RateLimited,
            message: message.into(),
            status: Some(429),
            retry_after,
        }
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ServerError,
            message: message.into(),
            status: Some(status),
            retry_after: None,
        }
    }

    pub fn client_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ClientError,
            message: message.into(),
            status: Some(status),
            retry_after: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::Parse,
            message: message.into(),
            status: None,
            retry_after: None,
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            LlmErrorKind::Network | LlmErrorKind::RateLimited | LlmErrorKind::ServerError
        )
    }
}

/// Map an HTTP status code onto an error kind.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        429 => LlmErrorKind::RateLimited,
        500..=599 => LlmErrorKind::ServerError,
        400..=499 => LlmErrorKind::ClientError,
        _ => LlmErrorKind::ServerError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(classify_http_status(429), LlmErrorKind::RateLimited);
        assert_eq!(classify_http_status(503), LlmErrorKind::ServerError);
        assert_eq!(classify_http_status(400), LlmErrorKind::ClientError);
        assert_eq!(classify_http_status(401), LlmErrorKind::ClientError);
    }

    #[test]
    fn retryability() {
        assert!(LlmError::network("timeout").is_retryable());
        assert!(LlmError::rate_limited("quota", None).is_retryable());
        assert!(LlmError::server_error(500, "oops").is_retryable());
        assert!(!LlmError::client_error(400, "bad key").is_retryable());
        assert!(!LlmError::parse_error("no candidates").is_retryable());
    }
}
