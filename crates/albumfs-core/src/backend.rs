//! PhotoBackend: the photo service exposed as a filesystem.
//!
//! Every operation resolves its path against the [`PatternTable`] first, then
//! checks that the matched role allows the operation, and only then talks to
//! the [`PhotoService`].
//!
//! # Path Structure
//!
//! - `""`: root, lists `album` and `playlist`
//! - `album`: every album
//! - `album/{name}`: photos in an album; `mkdir`/`rmdir` create and delete it
//! - `album/{name}/{file}`: one photo; `put`/`read`/`unlink`
//! - `playlist/...`: same shape
//!
//! Paths are relative to the backend root, which may itself sit inside the
//! layout (e.g. a root of `album` exposes the albums directly).

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;

use crate::remote::{Collection, NewPhoto, Photo, PhotoService};
use crate::routing::path;
use crate::routing::{CollectionKind, ListEntry, Lister, PatternTable, Role, RouteMatch, Style};
use crate::vfs::{DirEntry, FileAttr, VfsError, VfsOps, VfsResult};

/// Result of [`PhotoBackend::open`].
#[derive(Debug)]
pub enum OpenedRoot {
    /// The root names a directory (or nothing yet).
    Directory(PhotoBackend),
    /// The root named an existing photo; the backend was re-rooted at its
    /// collection and `leaf` is the photo's filename.
    File { backend: PhotoBackend, leaf: String },
}

impl OpenedRoot {
    pub fn backend(&self) -> &PhotoBackend {
        match self {
            OpenedRoot::Directory(backend) => backend,
            OpenedRoot::File { backend, .. } => backend,
        }
    }

    pub fn into_backend(self) -> PhotoBackend {
        match self {
            OpenedRoot::Directory(backend) => backend,
            OpenedRoot::File { backend, .. } => backend,
        }
    }
}

/// Filesystem adapter over a [`PhotoService`].
pub struct PhotoBackend {
    root: String,
    table: Arc<PatternTable>,
    service: Arc<dyn PhotoService>,
    /// Timestamp for synthesized directories.
    started: SystemTime,
    read_only: bool,
    /// Held while creating a collection so concurrent mkdirs don't make twins.
    create_lock: Mutex<()>,
}

impl std::fmt::Debug for PhotoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoBackend")
            .field("root", &self.root)
            .field("rules", &self.table.len())
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl PhotoBackend {
    /// Create a backend rooted at `root` (a virtual path, `""` for the top).
    pub fn new(root: &str, table: Arc<PatternTable>, service: Arc<dyn PhotoService>) -> Self {
        Self {
            root: path::normalize_root(root),
            table,
            service,
            started: SystemTime::now(),
            read_only: false,
            create_lock: Mutex::new(()),
        }
    }

    /// Set whether this filesystem is read-only.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Check the root, re-rooting at the parent if it names an existing photo.
    pub async fn open(self) -> OpenedRoot {
        if self.table.resolve(&self.root, "", Style::File).is_none() {
            return OpenedRoot::Directory(self);
        }

        let (parent, leaf) = path::split_leaf(&self.root);
        let (parent, leaf) = (parent.to_string(), leaf.to_string());
        let candidate = Self {
            root: parent,
            table: Arc::clone(&self.table),
            service: Arc::clone(&self.service),
            started: self.started,
            read_only: self.read_only,
            create_lock: Mutex::new(()),
        };

        let attr = candidate.getattr(Path::new(&leaf)).await;
        match attr {
            Ok(attr) if attr.is_file() => {
                tracing::debug!(root = %candidate.root, %leaf, "root is a file");
                OpenedRoot::File {
                    backend: candidate,
                    leaf,
                }
            }
            _ => OpenedRoot::Directory(self),
        }
    }

    /// Mount root, normalized.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Resolve a path relative to this backend's root.
    pub fn resolve(&self, path: &Path, style: Style) -> Option<RouteMatch<'_>> {
        self.table.resolve(&self.root, &path.to_string_lossy(), style)
    }

    /// Resolve or explain why not: the path may exist with the other style.
    fn route(&self, path: &Path, style: Style) -> VfsResult<RouteMatch<'_>> {
        if let Some(m) = self.resolve(path, style) {
            return Ok(m);
        }
        let shown = path.display().to_string();
        match style {
            Style::File if self.resolve(path, Style::Directory).is_some() => {
                Err(VfsError::is_a_directory(shown))
            }
            Style::Directory if self.resolve(path, Style::File).is_some() => {
                Err(VfsError::not_a_directory(shown))
            }
            _ => Err(VfsError::not_found(shown)),
        }
    }

    fn check_writable(&self) -> VfsResult<()> {
        if self.read_only {
            Err(VfsError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Kind, collection and item of an item route.
    fn item_parts<'m>(m: &'m RouteMatch<'_>) -> VfsResult<(CollectionKind, &'m str, &'m str)> {
        match (m.kind(), m.collection(), m.item()) {
            (Some(kind), Some(collection), Some(item)) => Ok((kind, collection, item)),
            _ => Err(VfsError::invalid_path(m.captures[0].clone())),
        }
    }

    /// Look up exactly one collection by name.
    async fn find_collection(&self, kind: CollectionKind, name: &str) -> VfsResult<Collection> {
        let mut hits = self.service.collections_by_name(kind, name).await?;
        match hits.len() {
            0 => Err(VfsError::not_found(format!("{kind}/{name}"))),
            1 => Ok(hits.remove(0)),
            count => Err(VfsError::Ambiguous {
                name: name.to_string(),
                count,
            }),
        }
    }

    async fn find_photo(
        &self,
        kind: CollectionKind,
        collection: &Collection,
        filename: &str,
    ) -> VfsResult<Photo> {
        self.service
            .photos(kind, &collection.id)
            .await?
            .into_iter()
            .find(|p| p.filename == filename)
            .ok_or_else(|| VfsError::not_found(format!("{kind}/{}/{filename}", collection.name)))
    }

    fn collection_attr(&self, collection: &Collection) -> FileAttr {
        FileAttr::directory(0o755)
            .with_mtime(collection.created)
            .with_id(collection.id.clone())
            .with_items(collection.photo_count)
    }

    fn photo_attr(photo: &Photo) -> FileAttr {
        FileAttr::file(photo.size, 0o644)
            .with_mtime(photo.modified)
            .with_id(photo.id.clone())
            .with_mime_type(photo.mime_type.clone())
    }
}

#[async_trait]
impl Lister for PhotoBackend {
    async fn list_collections(
        &self,
        prefix: &str,
        kind: CollectionKind,
    ) -> VfsResult<Vec<ListEntry>> {
        let collections = self.service.collections(kind).await?;
        Ok(collections
            .into_iter()
            .map(|c| {
                ListEntry::directory(format!("{prefix}{}", c.name), c.created)
                    .with_id(c.id)
                    .with_items(c.photo_count)
            })
            .collect())
    }

    async fn list_items(
        &self,
        prefix: &str,
        kind: CollectionKind,
        collection: &str,
    ) -> VfsResult<Vec<ListEntry>> {
        let collection = self.find_collection(kind, collection).await?;
        let photos = self.service.photos(kind, &collection.id).await?;
        Ok(photos
            .into_iter()
            .map(|p| {
                ListEntry::file(format!("{prefix}{}", p.filename), p.size, p.modified)
                    .with_id(p.id)
                    .with_mime_type(p.mime_type)
            })
            .collect())
    }

    fn dir_time(&self) -> SystemTime {
        self.started
    }
}

#[async_trait]
impl VfsOps for PhotoBackend {
    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.getattr", err)]
    async fn getattr(&self, path: &Path) -> VfsResult<FileAttr> {
        if let Some(m) = self.resolve(path, Style::Directory) {
            match (m.role(), m.kind(), m.collection()) {
                (Role::Root | Role::KindRoot, _, _) => {
                    return Ok(FileAttr::directory(0o755).with_mtime(self.started));
                }
                (Role::Collection, Some(kind), Some(name)) => {
                    let collection = self.find_collection(kind, name).await?;
                    return Ok(self.collection_attr(&collection));
                }
                _ => {}
            }
        }

        let m = self.route(path, Style::File)?;
        let (kind, collection, item) = Self::item_parts(&m)?;
        let collection = self.find_collection(kind, collection).await?;
        let photo = self.find_photo(kind, &collection, item).await?;
        Ok(Self::photo_attr(&photo))
    }

    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.readdir", err)]
    async fn readdir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        let m = self.route(path, Style::Directory)?;
        let entries = m.list(self).await?;
        tracing::debug!(count = entries.len(), prefix = %m.prefix, "listed");
        Ok(entries.iter().map(ListEntry::to_dir_entry).collect())
    }

    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.readdir_attrs", err)]
    async fn readdir_attrs(&self, path: &Path) -> VfsResult<Vec<(DirEntry, FileAttr)>> {
        let m = self.route(path, Style::Directory)?;
        let entries = m.list(self).await?;
        Ok(entries
            .iter()
            .map(|e| (e.to_dir_entry(), e.to_attr()))
            .collect())
    }

    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.read", err)]
    async fn read(&self, path: &Path, offset: u64, size: u32) -> VfsResult<Vec<u8>> {
        let m = self.route(path, Style::File)?;
        let (kind, collection, item) = Self::item_parts(&m)?;
        let collection = self.find_collection(kind, collection).await?;
        let photo = self.find_photo(kind, &collection, item).await?;
        let data = self.service.photo_content(kind, &photo).await?;

        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        if start >= data.len() {
            return Ok(Vec::new());
        }
        let end = start.saturating_add(size as usize).min(data.len());
        Ok(data[start..end].to_vec())
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, data),
        fields(len = data.len()),
        name = "albumfs.put",
        err
    )]
    async fn put(&self, path: &Path, data: &[u8]) -> VfsResult<FileAttr> {
        self.check_writable()?;
        let m = match self.resolve(path, Style::File) {
            Some(m) if m.rule.can_upload() => m,
            _ => {
                return Err(VfsError::not_permitted_here(format!(
                    "can't upload files here: {}",
                    path.display()
                )));
            }
        };

        let (kind, collection, item) = Self::item_parts(&m)?;
        let collection = self.find_collection(kind, collection).await?;
        let photo = self
            .service
            .add_photo(kind, &collection.id, NewPhoto::new(item, data.to_vec()))
            .await?;
        tracing::info!(%kind, collection = %collection.name, file = %photo.filename, size = photo.size, "uploaded photo");
        Ok(Self::photo_attr(&photo))
    }

    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.mkdir", err)]
    async fn mkdir(&self, path: &Path) -> VfsResult<FileAttr> {
        self.check_writable()?;
        let m = self.route(path, Style::Directory)?;
        let (kind, name) = match (m.rule.can_create_collection(), m.kind(), m.collection()) {
            (true, Some(kind), Some(name)) => (kind, name),
            _ => {
                return Err(VfsError::not_permitted_here(format!(
                    "can't create a directory here: {}",
                    path.display()
                )));
            }
        };

        let _guard = self.create_lock.lock().await;
        let existing = self.service.collections_by_name(kind, name).await?;
        if let Some(collection) = existing.first() {
            return Ok(self.collection_attr(collection));
        }

        let collection = self.service.create_collection(kind, name).await?;
        tracing::info!(%kind, name = %collection.name, id = %collection.id, "created collection");
        Ok(self.collection_attr(&collection))
    }

    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.unlink", err)]
    async fn unlink(&self, path: &Path) -> VfsResult<()> {
        self.check_writable()?;
        let m = self.route(path, Style::File)?;
        let (kind, collection, item) = Self::item_parts(&m)?;
        let collection = self.find_collection(kind, collection).await?;
        let photo = self.find_photo(kind, &collection, item).await?;
        self.service
            .delete_photo(kind, &collection.id, &photo.id)
            .await?;
        tracing::info!(%kind, collection = %collection.name, file = %photo.filename, "deleted photo");
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self), name = "albumfs.rmdir", err)]
    async fn rmdir(&self, path: &Path) -> VfsResult<()> {
        self.check_writable()?;
        let m = self.route(path, Style::Directory)?;
        let (kind, name) = match (m.rule.can_create_collection(), m.kind(), m.collection()) {
            (true, Some(kind), Some(name)) => (kind, name),
            _ => {
                return Err(VfsError::not_permitted_here(format!(
                    "can't remove a directory here: {}",
                    path.display()
                )));
            }
        };

        let collection = self.find_collection(kind, name).await?;
        if !self.service.photos(kind, &collection.id).await?.is_empty() {
            return Err(VfsError::directory_not_empty(path.display().to_string()));
        }
        self.service.delete_collection(kind, &collection.id).await?;
        tracing::info!(%kind, name = %collection.name, "removed collection");
        Ok(())
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}
