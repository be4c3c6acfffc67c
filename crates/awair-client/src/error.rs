//! Error types for the awair-client crate

use std::fmt;
use thiserror::Error;

/// Which half of the device identity could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceField {
    /// Device type (e.g. `awair-element`)
    Type,

    /// Numeric device id
    Id,
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceField::Type => f.write_str("type"),
            DeviceField::Id => f.write_str("id"),
        }
    }
}

/// Failures of the HTTP exchange itself
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or request-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("Server error: {status} - {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// Check if a read request failing this way should be attempted again
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            TransportError::Status { status, .. } => (500..600).contains(status),
        }
    }
}

/// Errors returned by [`AwairClient`](crate::AwairClient) operations
#[derive(Debug, Error)]
pub enum AwairError {
    /// Device-scoped call with no device type or id available
    #[error("Missing device {0}")]
    MissingDeviceIdentity(DeviceField),

    /// Caller-supplied header that is not a plain name/value pair
    #[error("Invalid header: {0}")]
    InvalidHeaderShape(String),

    /// A typed value outside its allowed range
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// HTTP failure after the retry policy was applied
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Successful response whose body does not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request body that could not be serialized
    #[error("Encode error: {0}")]
    Encode(serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AwairError {
    fn from(err: reqwest::Error) -> Self {
        AwairError::Transport(TransportError::Network(err))
    }
}

impl AwairError {
    /// Check if this is a transport-level error
    pub fn is_transport_error(&self) -> bool {
        matches!(self, AwairError::Transport(_))
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            AwairError::Transport(e) => e.is_transient(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            AwairError::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Create a status error from status and body
    pub fn status_error(status: u16, body: impl Into<String>) -> Self {
        AwairError::Transport(TransportError::Status {
            status,
            body: body.into(),
        })
    }
}

/// Result type for Awair operations
pub type AwairResult<T> = Result<T, AwairError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(AwairError::status_error(500, "Internal error").is_retryable());
        assert!(AwairError::status_error(503, "").is_retryable());
        assert!(!AwairError::status_error(404, "not found").is_retryable());
        assert!(!AwairError::MissingDeviceIdentity(DeviceField::Id).is_retryable());
        assert!(!AwairError::InvalidHeaderShape("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_status() {
        assert_eq!(AwairError::status_error(401, "denied").status(), Some(401));
        assert!(AwairError::status_error(401, "denied").is_transport_error());
        assert_eq!(AwairError::Config("x".to_string()).status(), None);
    }

    #[test]
    fn test_encode_is_not_decode() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = AwairError::Encode(source);
        assert!(err.to_string().starts_with("Encode error"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AwairError::MissingDeviceIdentity(DeviceField::Type).to_string(),
            "Missing device type"
        );
        assert_eq!(
            AwairError::status_error(500, "boom").to_string(),
            "Server error: 500 - boom"
        );
    }
}
