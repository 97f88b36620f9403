//! Transport interface
//!
//! The SOAP engine that actually reaches the service lives outside this crate.
//! A [`Transport`] sends one request body under an operation name and hands
//! back the raw response body.

use thiserror::Error;

/// Opaque failure from the transport (network, framing, SOAP fault)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transport error: {message}")]
pub struct TransportError {
    /// Description supplied by the transport
    pub message: String,
}

impl TransportError {
    /// Create transport error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request/response exchange with the SMO service
pub trait Transport {
    /// Send `body` under `operation` and return the raw response body.
    ///
    /// Blocks until a response or a failure is available.
    fn invoke(&self, operation: &str, body: &str) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn invoke(&self, operation: &str, body: &str) -> Result<String, TransportError> {
        (**self).invoke(operation, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn invoke(&self, operation: &str, body: &str) -> Result<String, TransportError> {
        (**self).invoke(operation, body)
    }
}
