//! Error types for hook.

use thiserror::Error;

/// Errors that can occur while talking to the Hook server or running the client.
#[derive(Debug, Error)]
pub enum HookError {
    /// Configuration could not be read, written or resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a usable HTTP response.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body or payload could not be (de)serialized.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("{0}")]
    Server(String),

    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// Requested item was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl HookError {
    /// Build a server error from an optional response message.
    #[must_use]
    pub fn server(message: Option<&str>, fallback: &str) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::Server(m.to_string()),
            _ => Self::Server(fallback.to_string()),
        }
    }

    /// Whether the failure happened on the wire rather than in the server's logic.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_uses_message() {
        let err = HookError::server(Some("No active timer found"), "Request failed");
        assert_eq!(err.to_string(), "No active timer found");
    }

    #[test]
    fn test_server_falls_back_on_blank() {
        assert_eq!(HookError::server(None, "Request failed").to_string(), "Request failed");
        assert_eq!(HookError::server(Some("  "), "Request failed").to_string(), "Request failed");
    }

    #[test]
    fn test_validation_display() {
        let err = HookError::Validation("Please enter a task name".to_string());
        assert_eq!(err.to_string(), "Please enter a task name");
        assert!(!err.is_transport());
    }
}
