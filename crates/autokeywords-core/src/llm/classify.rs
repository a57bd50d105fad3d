//! Classification of completion failures

use crate::error::{AutoKeywordsError, ErrorKind};

impl ErrorKind {
    /// Classify a failure from its HTTP status, or from its text when no status is known
    pub fn classify(status: Option<u16>, text: &str) -> Self {
        match status {
            Some(401) | Some(403) => Self::AuthError,
            Some(402) => Self::TokenLimitExceeded,
            Some(429) => Self::RateLimited,
            Some(_) => Self::TransportError,
            None => Self::classify_text(text),
        }
    }

    fn classify_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("429") || lower.contains("rate limit") {
            Self::RateLimited
        } else if lower.contains("402") || lower.contains("token limit") {
            Self::TokenLimitExceeded
        } else if lower.contains("401") || lower.contains("unauthorized") {
            Self::AuthError
        } else {
            Self::TransportError
        }
    }

    /// Whether a failure of this kind should exclude the model and try others
    pub fn triggers_fallback(&self) -> bool {
        !matches!(self, Self::RateLimited)
    }
}

/// A failed completion, already classified
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompletionError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl CompletionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportError, message)
    }

    /// Build from a non-success HTTP response, with remediation text
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = ErrorKind::classify(Some(status), body);
        let message = match kind {
            ErrorKind::AuthError => format!(
                "Authentication error: the API key was rejected (HTTP {}).\n\n\
                 How to fix:\n\
                 1. Check that the API key is entered correctly\n\
                 2. Check that the key has not expired\n\
                 3. Check that the account has enough credit\n\n\
                 Details: {}",
                status, body
            ),
            ErrorKind::RateLimited => format!(
                "Rate limit error: the request limit has been reached (HTTP {}).\n\n\
                 How to fix:\n\
                 1. Wait a few minutes and try again\n\
                 2. Upgrade the API plan for higher limits\n\
                 3. Switch to a lighter model for now\n\n\
                 Details: {}",
                status, body
            ),
            ErrorKind::TokenLimitExceeded => format!(
                "Token limit error: the plan's token limit has been reached (HTTP {}).\n\n\
                 How to fix:\n\
                 1. Choose a lightweight model\n\
                 2. Reduce the keyword count to 5 or fewer\n\
                 3. Shorten the content\n\
                 4. Upgrade to a paid plan\n\n\
                 Details: {}",
                status, body
            ),
            _ => format!("API error (HTTP {}): {}", status, body),
        };
        Self {
            kind,
            status: Some(status),
            message,
        }
    }

    /// Build from a request-level failure (connect, timeout, body read)
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let kind = if err.is_timeout() || err.is_connect() {
            ErrorKind::TransportError
        } else {
            ErrorKind::classify(status, &err.to_string())
        };
        Self {
            kind,
            status,
            message: format!("API connection error: {}", err),
        }
    }
}

impl From<CompletionError> for AutoKeywordsError {
    fn from(err: CompletionError) -> Self {
        AutoKeywordsError::Generation {
            kind: err.kind,
            message: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_status() {
        assert_eq!(ErrorKind::classify(Some(401), ""), ErrorKind::AuthError);
        assert_eq!(ErrorKind::classify(Some(403), ""), ErrorKind::AuthError);
        assert_eq!(
            ErrorKind::classify(Some(402), ""),
            ErrorKind::TokenLimitExceeded
        );
        assert_eq!(ErrorKind::classify(Some(429), ""), ErrorKind::RateLimited);
        // status wins over misleading text
        assert_eq!(
            ErrorKind::classify(Some(503), "rate limit"),
            ErrorKind::TransportError
        );
    }

    #[test]
    fn test_classify_by_text() {
        assert_eq!(
            ErrorKind::classify(None, "HTTP 429 Too Many Requests"),
            ErrorKind::RateLimited
        );
        assert_eq!(
            ErrorKind::classify(None, "Token limit reached"),
            ErrorKind::TokenLimitExceeded
        );
        assert_eq!(
            ErrorKind::classify(None, "connection reset by peer"),
            ErrorKind::TransportError
        );
    }

    #[test]
    fn test_only_rate_limit_skips_fallback() {
        assert!(!ErrorKind::RateLimited.triggers_fallback());
        for kind in [
            ErrorKind::TransportError,
            ErrorKind::AuthError,
            ErrorKind::TokenLimitExceeded,
            ErrorKind::MalformedResponse,
        ] {
            assert!(kind.triggers_fallback());
        }
    }

    #[test]
    fn test_from_status_adds_remediation() {
        let err = CompletionError::from_status(429, "slow down");
        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert!(err.message.contains("Wait a few minutes"));
        assert!(err.message.ends_with("Details: slow down"));

        let err = CompletionError::from_status(404, "missing");
        assert_eq!(err.message, "API error (HTTP 404): missing");
    }

    #[test]
    fn test_into_generation_error() {
        let err: AutoKeywordsError = CompletionError::malformed("empty").into();
        assert_eq!(err.kind(), Some(ErrorKind::MalformedResponse));
        assert_eq!(err.to_string(), "empty");
    }
}
