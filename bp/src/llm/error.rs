//! Completion error types

use thiserror::Error;

/// Errors that can occur during a completion request
///
/// These are returned as values, never thrown past the client boundary.
/// The response normalizer is the single place they become user-visible.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The provider credential was absent at startup
    #[error("completion credential is not configured (set the {0} environment variable)")]
    Configuration(String),

    /// The network call itself could not complete
    #[error("network error: {0}")]
    Transport(String),

    /// The remote service responded with a non-success status
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body did not match the expected envelope
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        CompletionError::Transport(e.to_string())
    }
}

impl CompletionError {
    /// Short stable tag for logs and error-shaped results
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Configuration(_) => "configuration",
            CompletionError::Transport(_) => "transport",
            CompletionError::Provider { .. } => "provider",
            CompletionError::MalformedResponse(_) => "malformed-response",
        }
    }

    /// Check if this is a missing-credential error
    pub fn is_configuration(&self) -> bool {
        matches!(self, CompletionError::Configuration(_))
    }

    /// Get the provider's message text, if the remote supplied one
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            CompletionError::Provider { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(CompletionError::Configuration("KEY".to_string()).kind(), "configuration");
        assert_eq!(CompletionError::Transport("timed out".to_string()).kind(), "transport");
        assert_eq!(
            CompletionError::Provider {
                status: 500,
                message: "boom".to_string()
            }
            .kind(),
            "provider"
        );
        assert_eq!(
            CompletionError::MalformedResponse("no content".to_string()).kind(),
            "malformed-response"
        );
    }

    #[test]
    fn test_is_configuration() {
        assert!(CompletionError::Configuration("KEY".to_string()).is_configuration());
        assert!(!CompletionError::Transport("reset".to_string()).is_configuration());
    }

    #[test]
    fn test_display_embeds_detail() {
        let err = CompletionError::Configuration("OPENAI_API_KEY".to_string());
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let err = CompletionError::Provider {
            status: 503,
            message: "overloaded".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("overloaded"));
    }

    #[test]
    fn test_provider_message() {
        let err = CompletionError::Provider {
            status: 400,
            message: "bad request".to_string(),
        };
        assert_eq!(err.provider_message(), Some("bad request"));

        let err = CompletionError::Transport("reset".to_string());
        assert_eq!(err.provider_message(), None);
    }
}
