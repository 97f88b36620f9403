//! Error types for SMO submission

use crate::transport::TransportError;
use thiserror::Error;

/// Result type for SMO operations
pub type Result<T> = std::result::Result<T, Error>;

/// SMO client errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed structural value passed to a setter (supplier id, record id, date)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Submission attempted without a required id or without content and resource
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Failure reported by the transport, passed through unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response body could not be parsed or lacks an expected element
    #[error("Bad response: {0}")]
    BadResponse(String),

    /// Business-level failure reported by the service
    #[error("{message} ({code})")]
    Remote {
        /// Service error code
        code: String,
        /// Service error description
        message: String,
    },

    /// Request body could not be written
    #[error("XML serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Remote error code, if this is a service-reported failure
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Error::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}
