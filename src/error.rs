//! Error types for shmwire
//!
//! Decode failures are local protocol errors. Business failures (object
//! absent, name unknown, ...) never show up here: they travel as an
//! `error_reply` carrying a [`Status`](crate::status::Status).

use thiserror::Error;

use crate::status::{Status, StatusCode};

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for encode/decode operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Structural Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Protocol error: expected message type '{expected}', got '{found}'")]
    TypeTag {
        expected: &'static str,
        found: String,
    },

    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    // -------------------------------------------------------------------------
    // Field Errors
    // -------------------------------------------------------------------------
    #[error("Missing field: '{0}'")]
    MissingField(String),

    #[error("Type mismatch: field '{field}' is not a valid {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),
}

impl WireError {
    /// True for errors caused by the document's shape rather than one field
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            WireError::Protocol(_)
                | WireError::TypeTag { .. }
                | WireError::MessageTooLarge { .. }
                | WireError::UnknownCommand(_)
        )
    }

    /// Status a receiver reports for this failure
    pub fn to_status(&self) -> Status {
        let code = match self {
            WireError::MissingField(_) => StatusCode::KeyError,
            WireError::TypeMismatch { .. } => StatusCode::TypeError,
            _ => StatusCode::Invalid,
        };
        Status::new(code, self.to_string())
    }
}

impl From<WireError> for Status {
    fn from(err: WireError) -> Self {
        err.to_status()
    }
}
