//! In-memory photo service.
//!
//! Used for testing and `albumfs --memory`. All data is ephemeral.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::time::SystemTime;
use uuid::Uuid;

use super::error::{RemoteError, RemoteResult};
use super::service::PhotoService;
use super::types::{validate_name, Collection, NewPhoto, Photo};
use crate::routing::CollectionKind;

#[derive(Debug)]
struct StoredPhoto {
    photo: Photo,
    data: Vec<u8>,
}

#[derive(Debug)]
struct StoredCollection {
    info: Collection,
    photos: Vec<StoredPhoto>,
}

impl StoredCollection {
    fn snapshot(&self) -> Collection {
        Collection {
            photo_count: self.photos.len() as u64,
            ..self.info.clone()
        }
    }
}

/// In-memory photo service.
///
/// Thread-safe via an internal `RwLock`. Like real photo services it allows
/// several collections with the same name.
#[derive(Debug, Default)]
pub struct MemoryPhotoService {
    collections: RwLock<Vec<StoredCollection>>,
}

impl MemoryPhotoService {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_mut<'a>(
        collections: &'a mut [StoredCollection],
        kind: CollectionKind,
        id: &str,
    ) -> RemoteResult<&'a mut StoredCollection> {
        collections
            .iter_mut()
            .find(|c| c.info.kind == kind && c.info.id == id)
            .ok_or_else(|| RemoteError::CollectionNotFound(id.to_string()))
    }
}

#[async_trait]
impl PhotoService for MemoryPhotoService {
    async fn collections(&self, kind: CollectionKind) -> RemoteResult<Vec<Collection>> {
        let collections = self.collections.read();
        Ok(collections
            .iter()
            .filter(|c| c.info.kind == kind)
            .map(StoredCollection::snapshot)
            .collect())
    }

    async fn create_collection(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> RemoteResult<Collection> {
        validate_name(name)?;
        let info = Collection {
            id: Uuid::new_v4().to_string(),
            kind,
            name: name.to_string(),
            photo_count: 0,
            created: SystemTime::now(),
        };
        self.collections.write().push(StoredCollection {
            info: info.clone(),
            photos: Vec::new(),
        });
        Ok(info)
    }

    async fn delete_collection(&self, kind: CollectionKind, id: &str) -> RemoteResult<()> {
        let mut collections = self.collections.write();
        let before = collections.len();
        collections.retain(|c| !(c.info.kind == kind && c.info.id == id));
        if collections.len() == before {
            return Err(RemoteError::CollectionNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn photos(&self, kind: CollectionKind, collection_id: &str) -> RemoteResult<Vec<Photo>> {
        let collections = self.collections.read();
        let collection = collections
            .iter()
            .find(|c| c.info.kind == kind && c.info.id == collection_id)
            .ok_or_else(|| RemoteError::CollectionNotFound(collection_id.to_string()))?;
        Ok(collection.photos.iter().map(|p| p.photo.clone()).collect())
    }

    async fn add_photo(
        &self,
        kind: CollectionKind,
        collection_id: &str,
        photo: NewPhoto,
    ) -> RemoteResult<Photo> {
        validate_name(&photo.filename)?;
        let mut collections = self.collections.write();
        let collection = Self::find_mut(&mut collections, kind, collection_id)?;

        // Same filename in the same collection replaces the photo and keeps its id.
        let existing = collection
            .photos
            .iter()
            .position(|p| p.photo.filename == photo.filename);
        let id = match existing {
            Some(index) => collection.photos[index].photo.id.clone(),
            None => Uuid::new_v4().to_string(),
        };

        let stored = Photo {
            id,
            collection_id: collection_id.to_string(),
            filename: photo.filename,
            size: photo.data.len() as u64,
            mime_type: photo.mime_type,
            modified: SystemTime::now(),
        };
        let entry = StoredPhoto {
            photo: stored.clone(),
            data: photo.data,
        };
        match existing {
            Some(index) => collection.photos[index] = entry,
            None => collection.photos.push(entry),
        }
        Ok(stored)
    }

    async fn delete_photo(
        &self,
        kind: CollectionKind,
        collection_id: &str,
        photo_id: &str,
    ) -> RemoteResult<()> {
        let mut collections = self.collections.write();
        let collection = Self::find_mut(&mut collections, kind, collection_id)?;
        let before = collection.photos.len();
        collection.photos.retain(|p| p.photo.id != photo_id);
        if collection.photos.len() == before {
            return Err(RemoteError::PhotoNotFound(photo_id.to_string()));
        }
        Ok(())
    }

    async fn photo_content(&self, kind: CollectionKind, photo: &Photo) -> RemoteResult<Vec<u8>> {
        let collections = self.collections.read();
        collections
            .iter()
            .filter(|c| c.info.kind == kind && c.info.id == photo.collection_id)
            .flat_map(|c| c.photos.iter())
            .find(|p| p.photo.id == photo.id)
            .map(|p| p.data.clone())
            .ok_or_else(|| RemoteError::PhotoNotFound(photo.filename.clone()))
    }
}
