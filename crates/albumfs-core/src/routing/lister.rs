//! The lister seam: what a directory listing needs from its environment.

use async_trait::async_trait;
use std::time::SystemTime;

use super::kind::CollectionKind;
use super::path;
use crate::vfs::{DirEntry, FileAttr, FileType, VfsResult};

/// One entry produced by a listing.
///
/// `path` is qualified with the listing's prefix, so it is relative to the
/// mount root rather than to the listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub path: String,
    pub kind: FileType,
    pub mtime: SystemTime,
    pub size: u64,
    /// Remote identifier of the collection or photo.
    pub id: Option<String>,
    /// Number of photos in a collection, when the remote reports it.
    pub items: Option<u64>,
    pub mime_type: Option<String>,
}

impl ListEntry {
    pub fn directory(path: impl Into<String>, mtime: SystemTime) -> Self {
        Self {
            path: path.into(),
            kind: FileType::Directory,
            mtime,
            size: 0,
            id: None,
            items: None,
            mime_type: None,
        }
    }

    pub fn file(path: impl Into<String>, size: u64, mtime: SystemTime) -> Self {
        Self {
            path: path.into(),
            kind: FileType::File,
            mtime,
            size,
            id: None,
            items: None,
            mime_type: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_items(mut self, items: u64) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        path::leaf(&self.path)
    }

    pub fn to_dir_entry(&self) -> DirEntry {
        DirEntry::new(self.name(), self.kind)
    }

    pub fn to_attr(&self) -> FileAttr {
        let attr = match self.kind {
            FileType::Directory => FileAttr::directory(0o755),
            FileType::File => FileAttr::file(self.size, 0o644),
        }
        .with_mtime(self.mtime);
        let attr = match &self.id {
            Some(id) => attr.with_id(id.clone()),
            None => attr,
        };
        let attr = match &self.mime_type {
            Some(mime) => attr.with_mime_type(mime.clone()),
            None => attr,
        };
        match self.items {
            Some(items) => attr.with_items(items),
            None => attr,
        }
    }
}

/// Source of directory contents for listable routes.
#[async_trait]
pub trait Lister: Send + Sync {
    /// All collections of one kind, each as `prefix + name`.
    async fn list_collections(&self, prefix: &str, kind: CollectionKind)
    -> VfsResult<Vec<ListEntry>>;

    /// All photos in the named collection, each as `prefix + filename`.
    async fn list_items(
        &self,
        prefix: &str,
        kind: CollectionKind,
        collection: &str,
    ) -> VfsResult<Vec<ListEntry>>;

    /// Timestamp for synthesized directories.
    fn dir_time(&self) -> SystemTime;
}
