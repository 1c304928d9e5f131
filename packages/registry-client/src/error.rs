//! Error types for the registry client.

use thiserror::Error;

/// Result type for registry client operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registry client errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Configuration error (bad endpoint, client build failure)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Attempt exceeded its timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("Registry API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Body was not JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RegistryError::Timeout
        } else {
            RegistryError::Network(e.to_string())
        }
    }
}
