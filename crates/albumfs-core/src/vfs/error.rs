//! VFS error types.

use std::io;
use thiserror::Error;

use crate::remote::RemoteError;

/// VFS error type.
#[derive(Debug, Error)]
pub enum VfsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path exists but the operation is not legal at that position.
    #[error("operation not permitted here: {0}")]
    NotPermittedHere(String),

    /// Filesystem is read-only.
    #[error("filesystem is read-only")]
    ReadOnly,

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Directory not empty.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Invalid path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// More than one remote collection answers to the same name.
    #[error("{count} collections named {name:?}")]
    Ambiguous { name: String, count: usize },

    /// Remote service error.
    #[error("remote: {0}")]
    Remote(#[from] RemoteError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a NotPermittedHere error.
    pub fn not_permitted_here(path: impl Into<String>) -> Self {
        Self::NotPermittedHere(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl Into<String>) -> Self {
        Self::IsADirectory(path.into())
    }

    /// Create a DirectoryNotEmpty error.
    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Create an Other error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns true for the not-found family, including remote lookups.
    pub fn is_not_found(&self) -> bool {
        match self {
            VfsError::NotFound(_) => true,
            VfsError::Remote(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::NotPermittedHere(msg) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            VfsError::ReadOnly => {
                io::Error::new(io::ErrorKind::PermissionDenied, "filesystem is read-only")
            }
            VfsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            VfsError::IsADirectory(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            VfsError::DirectoryNotEmpty(msg) => {
                io::Error::new(io::ErrorKind::DirectoryNotEmpty, msg)
            }
            VfsError::InvalidPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            e @ VfsError::Ambiguous { .. } => io::Error::other(e.to_string()),
            VfsError::Remote(e) if e.is_not_found() => {
                io::Error::new(io::ErrorKind::NotFound, e.to_string())
            }
            VfsError::Remote(e) => io::Error::other(e.to_string()),
            VfsError::Other(msg) => io::Error::other(msg),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds() {
        let err: io::Error = VfsError::not_permitted_here("album").into();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        let err: io::Error = VfsError::not_found("album/x").into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = VfsError::Remote(RemoteError::PhotoNotFound("a.jpg".into())).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_ambiguous_message() {
        let err = VfsError::Ambiguous {
            name: "Vacation".into(),
            count: 2,
        };
        assert_eq!(err.to_string(), "2 collections named \"Vacation\"");
    }

    #[test]
    fn test_is_not_found() {
        assert!(VfsError::not_found("x").is_not_found());
        assert!(VfsError::Remote(RemoteError::CollectionNotFound("x".into())).is_not_found());
        assert!(!VfsError::ReadOnly.is_not_found());
    }
}
