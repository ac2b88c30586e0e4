use thiserror::Error;

/// Errors raised by a content provider (the remote repository API).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limit exceeded{}", reset_hint(.reset_at))]
    RateLimited { reset_at: Option<String> },

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode content for {path}: {reason}")]
    Decode { path: String, reason: String },
}

fn reset_hint(reset_at: &Option<String>) -> String {
    match reset_at {
        Some(at) => format!(", resets at {}", at),
        None => String::new(),
    }
}

impl ProviderError {
    /// Whether this error applies to one subtree/file only, leaving the
    /// rest of the run worth continuing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProviderError::NotFound(_) | ProviderError::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = ProviderError::NotFound("owner/repo".to_string());
        assert_eq!(err.to_string(), "Not found: owner/repo");
    }

    #[test]
    fn test_display_rate_limited_with_reset() {
        let err = ProviderError::RateLimited {
            reset_at: Some("1700000000".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded, resets at 1700000000"
        );
    }

    #[test]
    fn test_display_rate_limited_without_reset() {
        let err = ProviderError::RateLimited { reset_at: None };
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ProviderError::NotFound("x".into()).is_recoverable());
        assert!(ProviderError::Decode {
            path: "a".into(),
            reason: "binary".into()
        }
        .is_recoverable());
        assert!(!ProviderError::AccessDenied("x".into()).is_recoverable());
        assert!(!ProviderError::RateLimited { reset_at: None }.is_recoverable());
    }
}
