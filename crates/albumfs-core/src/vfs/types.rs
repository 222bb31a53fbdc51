//! Core VFS types.
//!
//! Path-based, no inodes. Photos are whole objects, so attributes carry the
//! remote id and mime type alongside the usual size and timestamps.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// A photo.
    File,
    /// The root, a collection-kind root, or a collection.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// File attributes (metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttr {
    /// Size in bytes.
    pub size: u64,
    /// File type.
    pub kind: FileType,
    /// Unix permissions (e.g., 0o644).
    pub perm: u32,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Number of hard links.
    pub nlink: u32,
    /// Remote identifier, when the entry maps onto a remote object.
    pub id: Option<String>,
    /// Mime type of a photo, if known.
    pub mime_type: Option<String>,
    /// Photo count of a collection, when the remote reports it.
    pub items: Option<u64>,
}

impl FileAttr {
    /// Create attributes for a file.
    pub fn file(size: u64, perm: u32) -> Self {
        Self {
            size,
            kind: FileType::File,
            perm,
            mtime: SystemTime::now(),
            nlink: 1,
            id: None,
            mime_type: None,
            items: None,
        }
    }

    /// Create attributes for a directory.
    pub fn directory(perm: u32) -> Self {
        Self {
            size: 0,
            kind: FileType::Directory,
            perm,
            mtime: SystemTime::now(),
            nlink: 2, // . and ..
            id: None,
            mime_type: None,
            items: None,
        }
    }

    /// Set the modification time.
    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = mtime;
        self
    }

    /// Set the remote identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the mime type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the item count.
    pub fn with_items(mut self, items: u64) -> Self {
        self.items = Some(items);
        self
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub kind: FileType,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: FileType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, FileType::File)
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, FileType::Directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type() {
        assert!(FileType::File.is_file());
        assert!(!FileType::File.is_dir());
        assert!(FileType::Directory.is_dir());
    }

    #[test]
    fn test_file_attr_constructors() {
        let file = FileAttr::file(1024, 0o644)
            .with_id("p-1")
            .with_mime_type("image/jpeg");
        assert!(file.is_file());
        assert_eq!(file.size, 1024);
        assert_eq!(file.id.as_deref(), Some("p-1"));
        assert_eq!(file.mime_type.as_deref(), Some("image/jpeg"));

        let dir = FileAttr::directory(0o755).with_mtime(SystemTime::UNIX_EPOCH);
        assert!(dir.is_dir());
        assert_eq!(dir.nlink, 2);
        assert_eq!(dir.mtime, SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn test_dir_entry() {
        let file = DirEntry::file("img1.jpg");
        assert_eq!(file.name, "img1.jpg");
        assert!(file.kind.is_file());

        let dir = DirEntry::directory("Vacation");
        assert!(dir.kind.is_dir());
    }
}
