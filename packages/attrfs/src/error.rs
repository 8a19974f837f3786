//! The unified error type.

/// Errors from any attrfs operation.
///
/// Wraps the error of whichever layer failed. Use [`Error::kind`] to branch
/// on what went wrong without caring which layer reported it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Attribute(#[from] attrfs_raw::Error),

    #[error(transparent)]
    Value(#[from] attrfs_value::Error),
}

/// What went wrong, independent of the layer that noticed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The target is not a local path. No OS call was made.
    InvalidTarget,
    /// The attribute name cannot be handed to the OS.
    InvalidName,
    /// The attribute does not exist.
    NotFound,
    /// Any other OS failure, with its raw error code.
    Os(i32),
    /// The value cannot be represented in the wire format. Nothing was written.
    EncodingRejected,
    /// The stored value does not have the shape asked for.
    TypeMismatch,
    /// The stored bytes are not a valid encoding.
    Malformed,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Attribute(err) => match err {
                attrfs_raw::Error::InvalidTarget { .. } => ErrorKind::InvalidTarget,
                attrfs_raw::Error::InvalidName { .. } => ErrorKind::InvalidName,
                attrfs_raw::Error::NotFound { .. } => ErrorKind::NotFound,
                attrfs_raw::Error::Os { code, .. } => ErrorKind::Os(*code),
            },
            Error::Value(err) => match err {
                attrfs_value::Error::EncodingRejected { .. } => ErrorKind::EncodingRejected,
                attrfs_value::Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                attrfs_value::Error::Malformed { .. } => ErrorKind::Malformed,
            },
        }
    }

    /// Check if the attribute was missing.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_wrapped_error() {
        let err: Error = attrfs_raw::Error::NotFound {
            name: "user.tag".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_not_found());

        let err: Error = attrfs_raw::Error::Os {
            code: 13,
            source: std::io::Error::from_raw_os_error(13),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Os(13));

        let err: Error = attrfs_value::Error::mismatch("expected string").into();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(!err.is_not_found());
    }

    #[test]
    fn display_is_transparent() {
        let err: Error = attrfs_value::Error::rejected("absent value").into();
        assert_eq!(err.to_string(), "encoding rejected: absent value");
    }
}
