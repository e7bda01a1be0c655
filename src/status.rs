//! Status codes
//!
//! A [`Status`] is the result code plus message carried by every reply.
//! Success is implicit in a normal reply; failures travel as `error_reply`.

use std::fmt;

/// Result codes understood by clients and daemons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    Invalid,
    KeyError,
    TypeError,
    IoError,
    EndOfFile,
    NotImplemented,
    AssertionFailed,
    UserInputError,

    ObjectExists,
    ObjectNotExists,
    ObjectSealed,
    ObjectNotSealed,
    ObjectIsBlob,

    MetaTreeInvalid,

    ServerNotReady,
    ConnectionFailed,
    ConnectionError,

    NotEnoughMemory,
    StreamDrained,
    StreamFailed,
    InvalidStreamState,
    StreamOpened,

    UnknownError,

    /// A code this build does not know; kept so it survives re-encoding
    Other(i64),
}

impl StatusCode {
    /// Numeric wire value
    pub fn code(self) -> i64 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::Invalid => 1,
            StatusCode::KeyError => 2,
            StatusCode::TypeError => 3,
            StatusCode::IoError => 4,
            StatusCode::EndOfFile => 5,
            StatusCode::NotImplemented => 6,
            StatusCode::AssertionFailed => 7,
            StatusCode::UserInputError => 8,
            StatusCode::ObjectExists => 11,
            StatusCode::ObjectNotExists => 12,
            StatusCode::ObjectSealed => 13,
            StatusCode::ObjectNotSealed => 14,
            StatusCode::ObjectIsBlob => 15,
            StatusCode::MetaTreeInvalid => 21,
            StatusCode::ServerNotReady => 31,
            StatusCode::ConnectionFailed => 33,
            StatusCode::ConnectionError => 34,
            StatusCode::NotEnoughMemory => 41,
            StatusCode::StreamDrained => 42,
            StatusCode::StreamFailed => 43,
            StatusCode::InvalidStreamState => 44,
            StatusCode::StreamOpened => 45,
            StatusCode::UnknownError => 255,
            StatusCode::Other(code) => code,
        }
    }

    /// Map a numeric wire value back to a code; never fails
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::Invalid,
            2 => StatusCode::KeyError,
            3 => StatusCode::TypeError,
            4 => StatusCode::IoError,
            5 => StatusCode::EndOfFile,
            6 => StatusCode::NotImplemented,
            7 => StatusCode::AssertionFailed,
            8 => StatusCode::UserInputError,
            11 => StatusCode::ObjectExists,
            12 => StatusCode::ObjectNotExists,
            13 => StatusCode::ObjectSealed,
            14 => StatusCode::ObjectNotSealed,
            15 => StatusCode::ObjectIsBlob,
            21 => StatusCode::MetaTreeInvalid,
            31 => StatusCode::ServerNotReady,
            33 => StatusCode::ConnectionFailed,
            34 => StatusCode::ConnectionError,
            41 => StatusCode::NotEnoughMemory,
            42 => StatusCode::StreamDrained,
            43 => StatusCode::StreamFailed,
            44 => StatusCode::InvalidStreamState,
            45 => StatusCode::StreamOpened,
            255 => StatusCode::UnknownError,
            other => StatusCode::Other(other),
        }
    }
}

/// Result code plus human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Success with an empty message
    pub fn ok() -> Self {
        Self::new(StatusCode::Ok, "")
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Invalid, message)
    }

    pub fn object_not_exists(message: impl Into<String>) -> Self {
        Self::new(StatusCode::ObjectNotExists, message)
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NotImplemented, message)
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{:?}", self.code)
        } else {
            write!(f, "{:?}: {}", self.code, self.message)
        }
    }
}
