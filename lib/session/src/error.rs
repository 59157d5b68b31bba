//! Error types for the session crate.

use std::fmt;

/// Errors from the durable token mirror.
///
/// Mirror failures never abort the operation that triggered them; the
/// store logs them and carries on with the in-memory state. The session
/// just will not survive a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading, writing, or deleting the backing entry failed.
    Io { reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { reason } => {
                write!(f, "token mirror I/O error: {reason}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        let err = StorageError::Io {
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("token mirror"));
        assert!(err.to_string().contains("permission denied"));
    }
}
