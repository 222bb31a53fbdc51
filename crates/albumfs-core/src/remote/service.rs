//! The remote photo service seam.

use async_trait::async_trait;

use super::error::RemoteResult;
use super::types::{Collection, NewPhoto, Photo};
use crate::routing::CollectionKind;

/// Operations the filesystem adapter needs from a photo service.
///
/// Same-named collections are allowed; callers decide what to do with
/// more than one hit from [`collections_by_name`](Self::collections_by_name).
#[async_trait]
pub trait PhotoService: Send + Sync {
    /// All collections of a kind.
    async fn collections(&self, kind: CollectionKind) -> RemoteResult<Vec<Collection>>;

    /// Collections of a kind with exactly this name.
    async fn collections_by_name(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> RemoteResult<Vec<Collection>> {
        let all = self.collections(kind).await?;
        Ok(all.into_iter().filter(|c| c.name == name).collect())
    }

    async fn create_collection(&self, kind: CollectionKind, name: &str)
    -> RemoteResult<Collection>;

    async fn delete_collection(&self, kind: CollectionKind, id: &str) -> RemoteResult<()>;

    /// Photos in a collection.
    async fn photos(&self, kind: CollectionKind, collection_id: &str) -> RemoteResult<Vec<Photo>>;

    async fn add_photo(
        &self,
        kind: CollectionKind,
        collection_id: &str,
        photo: NewPhoto,
    ) -> RemoteResult<Photo>;

    async fn delete_photo(
        &self,
        kind: CollectionKind,
        collection_id: &str,
        photo_id: &str,
    ) -> RemoteResult<()>;

    /// Full content of a photo.
    async fn photo_content(&self, kind: CollectionKind, photo: &Photo) -> RemoteResult<Vec<u8>>;
}
