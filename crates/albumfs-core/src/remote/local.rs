//! Directory-backed photo service.
//!
//! Stores collections on disk as `<root>/<kind>/<collection>/<photo>`. The
//! collection id is its directory name and the photo id is its filename, so
//! names are unique per kind here even though the trait allows duplicates.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use super::error::{RemoteError, RemoteResult};
use super::service::PhotoService;
use super::types::{guess_mime_type, validate_name, Collection, NewPhoto, Photo};
use crate::routing::CollectionKind;

/// Photo service persisted in a local directory.
#[derive(Debug, Clone)]
pub struct DirPhotoService {
    root: PathBuf,
}

impl DirPhotoService {
    /// Create a service rooted at `root`. Nothing is created until first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, kind: CollectionKind) -> PathBuf {
        self.root.join(kind.as_str())
    }

    fn collection_dir(&self, kind: CollectionKind, id: &str) -> RemoteResult<PathBuf> {
        validate_name(id)?;
        Ok(self.kind_dir(kind).join(id))
    }

    /// Map a not-found I/O error onto the given remote error.
    fn not_found_as(e: io::Error, missing: impl FnOnce() -> RemoteError) -> RemoteError {
        if e.kind() == io::ErrorKind::NotFound {
            missing()
        } else {
            RemoteError::Io(e)
        }
    }

    async fn count_files(dir: &Path) -> RemoteResult<u64> {
        let mut count = 0;
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn ensure_collection(&self, kind: CollectionKind, id: &str) -> RemoteResult<PathBuf> {
        let dir = self.collection_dir(kind, id)?;
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(RemoteError::CollectionNotFound(id.to_string())),
            Err(e) => Err(Self::not_found_as(e, || {
                RemoteError::CollectionNotFound(id.to_string())
            })),
        }
    }
}

#[async_trait]
impl PhotoService for DirPhotoService {
    async fn collections(&self, kind: CollectionKind) -> RemoteResult<Vec<Collection>> {
        let mut entries = match fs::read_dir(self.kind_dir(kind)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut result = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            result.push(Collection {
                id: name.clone(),
                kind,
                name,
                photo_count: Self::count_files(&entry.path()).await?,
                created: meta
                    .created()
                    .or_else(|_| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn collections_by_name(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> RemoteResult<Vec<Collection>> {
        if validate_name(name).is_err() {
            return Ok(Vec::new());
        }
        let dir = self.kind_dir(kind).join(name);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(vec![Collection {
                id: name.to_string(),
                kind,
                name: name.to_string(),
                photo_count: Self::count_files(&dir).await?,
                created: meta
                    .created()
                    .or_else(|_| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH),
            }]),
            Ok(_) => Ok(Vec::new()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_collection(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> RemoteResult<Collection> {
        let dir = self.collection_dir(kind, name)?;
        fs::create_dir_all(self.kind_dir(kind)).await?;
        fs::create_dir(&dir).await.map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                RemoteError::CollectionExists(name.to_string())
            } else {
                RemoteError::Io(e)
            }
        })?;
        tracing::debug!(path = %dir.display(), "created collection directory");

        Ok(Collection {
            id: name.to_string(),
            kind,
            name: name.to_string(),
            photo_count: 0,
            created: SystemTime::now(),
        })
    }

    async fn delete_collection(&self, kind: CollectionKind, id: &str) -> RemoteResult<()> {
        let dir = self.collection_dir(kind, id)?;
        fs::remove_dir(&dir)
            .await
            .map_err(|e| Self::not_found_as(e, || RemoteError::CollectionNotFound(id.to_string())))
    }

    async fn photos(&self, kind: CollectionKind, collection_id: &str) -> RemoteResult<Vec<Photo>> {
        let dir = self.ensure_collection(kind, collection_id).await?;
        let mut entries = fs::read_dir(&dir).await?;

        let mut result = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            result.push(Photo {
                id: filename.clone(),
                collection_id: collection_id.to_string(),
                mime_type: guess_mime_type(&filename).to_string(),
                filename,
                size: meta.len(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }

        result.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(result)
    }

    async fn add_photo(
        &self,
        kind: CollectionKind,
        collection_id: &str,
        photo: NewPhoto,
    ) -> RemoteResult<Photo> {
        validate_name(&photo.filename)?;
        let dir = self.ensure_collection(kind, collection_id).await?;
        let size = photo.data.len() as u64;
        fs::write(dir.join(&photo.filename), &photo.data).await?;

        Ok(Photo {
            id: photo.filename.clone(),
            collection_id: collection_id.to_string(),
            filename: photo.filename,
            size,
            mime_type: photo.mime_type,
            modified: SystemTime::now(),
        })
    }

    async fn delete_photo(
        &self,
        kind: CollectionKind,
        collection_id: &str,
        photo_id: &str,
    ) -> RemoteResult<()> {
        validate_name(photo_id)?;
        let dir = self.ensure_collection(kind, collection_id).await?;
        fs::remove_file(dir.join(photo_id))
            .await
            .map_err(|e| Self::not_found_as(e, || RemoteError::PhotoNotFound(photo_id.to_string())))
    }

    async fn photo_content(&self, kind: CollectionKind, photo: &Photo) -> RemoteResult<Vec<u8>> {
        validate_name(&photo.id)?;
        let dir = self.ensure_collection(kind, &photo.collection_id).await?;
        fs::read(dir.join(&photo.id))
            .await
            .map_err(|e| Self::not_found_as(e, || RemoteError::PhotoNotFound(photo.filename.clone())))
    }
}
