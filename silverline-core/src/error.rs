//! Error types for the Silverline IP-list client

use thiserror::Error;

/// Core error type for Silverline operations
#[derive(Error, Debug)]
pub enum SilverlineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authorization failures (HTTP 401 or an "Unauthorized" response body)
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    /// Invalid input or arguments, detected before any request is issued
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-success HTTP status returned by the Silverline API
    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    /// Transport-level failures (connection, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed or unexpected response bodies
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Silverline operations
pub type Result<T> = std::result::Result<T, SilverlineError>;

impl From<serde_json::Error> for SilverlineError {
    fn from(err: serde_json::Error) -> Self {
        SilverlineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SilverlineError = json_err.into();

        match err {
            SilverlineError::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = SilverlineError::Config("missing API key".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing API key");

        let err = SilverlineError::Unauthorized("Unauthorized".to_string());
        assert_eq!(format!("{}", err), "Authorization error: Unauthorized");

        let err = SilverlineError::Api {
            status: 422,
            detail: "ip is invalid".to_string(),
        };
        assert_eq!(format!("{}", err), "API error (HTTP 422): ip is invalid");

        let err = SilverlineError::InvalidInput(
            "page_number and page_size should be numbers".to_string(),
        );
        assert_eq!(
            format!("{}", err),
            "Invalid input: page_number and page_size should be numbers"
        );
    }
}
