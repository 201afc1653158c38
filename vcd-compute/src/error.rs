//! Error types for the compute document layer.

use thiserror::Error;

/// Errors that can occur while compiling documents or issuing requests.
#[derive(Error, Debug)]
pub enum ComputeError {
    /// The configuration does not have the shape the document schema needs.
    ///
    /// Raised before any output is produced; compilation never returns a
    /// partial document.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// XML serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The remote service answered with a status the operation does not expect.
    #[error("Unexpected response status {actual} (expected {expected})")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        body: String,
    },

    /// Failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ComputeError {
    /// Shorthand for [`ComputeError::InvalidConfiguration`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// True when the error is a configuration shape violation.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

impl From<serde_json::Error> for ComputeError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}

/// Result type alias for compute operations.
pub type Result<T> = std::result::Result<T, ComputeError>;
