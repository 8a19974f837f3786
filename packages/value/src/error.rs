//! Error types for the value layer.

use std::fmt::Display;

/// Errors from encoding or decoding attribute values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value has no representation in the wire format.
    ///
    /// For example an absent (`None`) entry, a unit value, or an integer
    /// outside the signed 64-bit range.
    #[error("encoding rejected: {message}")]
    EncodingRejected { message: String },

    /// The decoded value does not have the shape the caller asked for.
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// The bytes are not a well-formed encoding.
    #[error("malformed encoding: {message}")]
    Malformed { message: String },
}

impl Error {
    /// Create an encoding-rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Error::EncodingRejected {
            message: message.into(),
        }
    }

    /// Create a type-mismatch error.
    pub fn mismatch(message: impl Into<String>) -> Self {
        Error::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a malformed-encoding error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::Malformed {
            message: message.into(),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::rejected(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::mismatch(msg.to_string())
    }
}
