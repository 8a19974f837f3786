//! Error types for the raw attribute layer.
//!
//! Errors at this level are OS-focused. Encoding failures and type
//! mismatches belong to the value layer.

use std::io;

use crate::sys;

/// Errors at the raw attribute layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target does not name an entry on a local filesystem.
    ///
    /// Raised before any OS call is made.
    #[error("invalid target: {target}")]
    InvalidTarget { target: String },

    /// The attribute name cannot be handed to the OS (empty, or contains NUL).
    #[error("invalid attribute name: {name:?}")]
    InvalidName { name: String },

    /// No attribute with this name exists on the target.
    #[error("attribute not found: {name}")]
    NotFound { name: String },

    /// Any other failure reported by the OS.
    ///
    /// `code` is the raw errno, kept for diagnostics.
    #[error("os error {code}: {source}")]
    Os {
        code: i32,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Translate an OS failure for an operation on a single named attribute.
    pub(crate) fn for_attribute(err: io::Error, name: &str) -> Self {
        match err.raw_os_error() {
            Some(code) if code == sys::ENOATTR => Error::NotFound {
                name: name.to_string(),
            },
            _ => Error::os(err),
        }
    }

    /// Translate an OS failure that has no attribute name attached (listing).
    pub(crate) fn os(err: io::Error) -> Self {
        Error::Os {
            // Errors built by std from errno always carry the raw code; -1
            // only shows up for synthetic errors.
            code: err.raw_os_error().unwrap_or(-1),
            source: err,
        }
    }

    /// The raw OS error code, if this error came from the OS.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Os { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this error means the attribute does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn missing_attribute_code_maps_to_not_found() {
        let err = Error::for_attribute(io::Error::from_raw_os_error(sys::ENOATTR), "user.tag");
        assert!(err.is_not_found());
        assert!(format!("{}", err).contains("user.tag"));
    }

    #[test]
    fn other_codes_keep_the_raw_errno() {
        let err = Error::for_attribute(io::Error::from_raw_os_error(libc::EACCES), "user.tag");
        assert!(!err.is_not_found());
        assert_eq!(err.code(), Some(libc::EACCES));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn listing_errors_never_become_not_found() {
        let err = Error::os(io::Error::from_raw_os_error(sys::ENOATTR));
        assert_eq!(err.code(), Some(sys::ENOATTR));
    }

    #[test]
    fn invalid_target_display() {
        let err = Error::InvalidTarget {
            target: "https://example.com/file".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("invalid target"));
        assert!(display.contains("example.com"));
        assert_eq!(err.code(), None);
    }
}
