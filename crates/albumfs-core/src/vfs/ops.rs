//! VFS operations trait.
//!
//! Path-based, whole-object writes. Photos cannot be edited in place, so
//! there is `put` instead of `create`/`write`/`truncate`.

use async_trait::async_trait;
use std::path::Path;

use super::types::{DirEntry, FileAttr};
use super::VfsResult;

/// Core VFS operations trait.
///
/// Paths are always relative to the backend's root.
#[async_trait]
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get file attributes.
    async fn getattr(&self, path: &Path) -> VfsResult<FileAttr>;

    /// Read directory entries.
    ///
    /// Returns all entries in the directory (no pagination).
    async fn readdir(&self, path: &Path) -> VfsResult<Vec<DirEntry>>;

    /// Read directory entries together with their attributes.
    ///
    /// Attributes come from the listing itself and must agree with
    /// `getattr` on each entry.
    async fn readdir_attrs(&self, path: &Path) -> VfsResult<Vec<(DirEntry, FileAttr)>>;

    /// Read file contents.
    ///
    /// Reads up to `size` bytes starting at `offset`.
    /// Returns fewer bytes if EOF is reached.
    async fn read(&self, path: &Path, offset: u64, size: u32) -> VfsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Upload a whole file.
    ///
    /// Returns the attributes of the stored object.
    async fn put(&self, path: &Path, data: &[u8]) -> VfsResult<FileAttr>;

    /// Create a new directory.
    ///
    /// Returns the attributes of the directory.
    async fn mkdir(&self, path: &Path) -> VfsResult<FileAttr>;

    /// Remove a file.
    async fn unlink(&self, path: &Path) -> VfsResult<()>;

    /// Remove an empty directory.
    async fn rmdir(&self, path: &Path) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns true if this filesystem is read-only.
    fn read_only(&self) -> bool;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> bool {
        self.getattr(path).await.is_ok()
    }

    /// Read entire file contents.
    async fn read_all(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let attr = self.getattr(path).await?;
        let size = u32::try_from(attr.size).unwrap_or(u32::MAX);
        self.read(path, 0, size).await
    }
}
