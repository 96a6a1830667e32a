//! Error types for the NeetCode client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Language has no execution-judge identifier. Raised before any request.
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Unauthorized request")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    /// Non-2xx response other than 401/403
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Connection, timeout or IO failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            ClientError::Unauthorized => "UNAUTHORIZED",
            ClientError::Forbidden => "FORBIDDEN",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Map an HTTP status and raw body to an error.
    ///
    /// The platform reports failures as `{"error": "..."}`; other bodies are
    /// passed through as text.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            _ => {
                let message = serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                    .unwrap_or_else(|| body.trim().to_string());
                ClientError::Server { status, message }
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(ClientError::from_status(401, ""), ClientError::Unauthorized));
        assert!(matches!(ClientError::from_status(403, "nope"), ClientError::Forbidden));
    }

    #[test]
    fn test_error_field_is_surfaced() {
        let err = ClientError::from_status(400, r#"{"error":"Problem not found"}"#);
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Problem not found");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_plain_body_is_kept() {
        let err = ClientError::from_status(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "Server error (502): Bad Gateway");
        assert_eq!(err.error_code(), "SERVER_ERROR");
    }

    #[test]
    fn test_unsupported_language_message() {
        let err = ClientError::UnsupportedLanguage("rust".into());
        assert_eq!(err.to_string(), "Language not supported: rust");
    }
}
