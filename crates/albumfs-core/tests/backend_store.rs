//! PhotoBackend over the on-disk store, end to end.

use std::path::Path;
use std::sync::Arc;

use albumfs_core::{
    AlbumFsConfig, CollectionKind, DirPhotoService, MemoryPhotoService, OpenedRoot,
    PatternTable, PhotoBackend, PhotoService, StoreConfig, VfsError, VfsOps,
};
use futures::future::join_all;
use tempfile::TempDir;

fn dir_backend(root: &str) -> (TempDir, PhotoBackend) {
    let dir = tempfile::tempdir().unwrap();
    let config = AlbumFsConfig {
        root: root.into(),
        store: StoreConfig::Directory {
            path: dir.path().to_path_buf(),
        },
        read_only: false,
    };
    let backend = config.build_backend(Arc::new(PatternTable::builtin()), config.build_service());
    (dir, backend)
}

fn memory_backend() -> PhotoBackend {
    PhotoBackend::new(
        "",
        Arc::new(PatternTable::builtin()),
        Arc::new(MemoryPhotoService::new()),
    )
}

fn names(entries: &[albumfs_core::DirEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[tokio::test]
async fn photos_survive_a_new_backend() {
    let (dir, fs) = dir_backend("");
    fs.mkdir(Path::new("album/Vacation")).await.unwrap();
    fs.put(Path::new("album/Vacation/img1.jpg"), b"jpeg bytes")
        .await
        .unwrap();
    assert!(dir.path().join("album/Vacation/img1.jpg").is_file());

    // Same directory, fresh backend.
    let again = PhotoBackend::new(
        "",
        Arc::new(PatternTable::builtin()),
        Arc::new(DirPhotoService::new(dir.path())),
    );
    let entries = again.readdir(Path::new("album/Vacation")).await.unwrap();
    assert_eq!(names(&entries), vec!["img1.jpg"]);
    assert_eq!(
        again.read_all(Path::new("album/Vacation/img1.jpg")).await.unwrap(),
        b"jpeg bytes"
    );

    let attr = again.getattr(Path::new("album/Vacation/img1.jpg")).await.unwrap();
    assert_eq!(attr.size, 10);
    assert_eq!(attr.mime_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn full_lifecycle_on_disk() {
    let (dir, fs) = dir_backend("");

    fs.mkdir(Path::new("playlist/Frame")).await.unwrap();
    fs.put(Path::new("playlist/Frame/a.png"), b"a").await.unwrap();
    fs.put(Path::new("playlist/Frame/b.png"), b"bb").await.unwrap();

    let playlists = fs.readdir(Path::new("playlist")).await.unwrap();
    assert_eq!(names(&playlists), vec!["Frame"]);
    assert!(fs.readdir(Path::new("album")).await.unwrap().is_empty());

    assert!(matches!(
        fs.rmdir(Path::new("playlist/Frame")).await,
        Err(VfsError::DirectoryNotEmpty(_))
    ));

    fs.unlink(Path::new("playlist/Frame/a.png")).await.unwrap();
    fs.unlink(Path::new("playlist/Frame/b.png")).await.unwrap();
    fs.rmdir(Path::new("playlist/Frame")).await.unwrap();

    assert!(!dir.path().join("playlist/Frame").exists());
    assert!(matches!(
        fs.getattr(Path::new("playlist/Frame")).await,
        Err(VfsError::NotFound(_))
    ));
}

#[tokio::test]
async fn uploads_only_land_at_item_positions() {
    let (_dir, fs) = dir_backend("");
    fs.mkdir(Path::new("album/Vacation")).await.unwrap();

    for path in ["", "album", "album/Vacation", "photos/x.jpg", "album/a/b/c.jpg"] {
        let err = fs.put(Path::new(path), b"x").await.unwrap_err();
        assert!(
            matches!(err, VfsError::NotPermittedHere(_)),
            "{path:?}: {err:?}"
        );
    }
}

#[tokio::test]
async fn rooted_backend_sees_one_subtree() {
    let (_dir, fs) = dir_backend("album");
    fs.mkdir(Path::new("Vacation")).await.unwrap();
    fs.put(Path::new("Vacation/img1.jpg"), b"x").await.unwrap();

    let entries = fs.readdir(Path::new("")).await.unwrap();
    assert_eq!(names(&entries), vec!["Vacation"]);

    assert!(matches!(
        fs.readdir(Path::new("../playlist")).await,
        Err(VfsError::NotFound(_))
    ));
}

#[tokio::test]
async fn root_naming_a_photo_opens_as_a_file() {
    let (dir, fs) = dir_backend("");
    fs.mkdir(Path::new("album/Vacation")).await.unwrap();
    fs.put(Path::new("album/Vacation/img1.jpg"), b"pixels")
        .await
        .unwrap();

    let config = AlbumFsConfig {
        root: "album/Vacation/img1.jpg".into(),
        store: StoreConfig::Directory {
            path: dir.path().to_path_buf(),
        },
        read_only: true,
    };
    let backend = config.build_backend(Arc::new(PatternTable::builtin()), config.build_service());

    match backend.open().await {
        OpenedRoot::File { backend, leaf } => {
            assert_eq!(backend.root(), "album/Vacation");
            assert_eq!(leaf, "img1.jpg");
            assert!(backend.read_only());
            assert_eq!(backend.read_all(Path::new(&leaf)).await.unwrap(), b"pixels");
        }
        other => panic!("expected a file root, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_mkdir_creates_one_collection() {
    let service = Arc::new(MemoryPhotoService::new());
    let fs = PhotoBackend::new(
        "",
        Arc::new(PatternTable::builtin()),
        service.clone() as Arc<dyn PhotoService>,
    );

    let results = join_all((0..16).map(|_| fs.mkdir(Path::new("album/Party")))).await;
    let ids: Vec<_> = results
        .into_iter()
        .map(|r| r.unwrap().id.unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));

    let albums = service.collections(CollectionKind::Album).await.unwrap();
    assert_eq!(albums.len(), 1);
}

async fn assert_put_replaces(fs: &PhotoBackend) {
    fs.mkdir(Path::new("album/V")).await.unwrap();
    fs.put(Path::new("album/V/a.jpg"), b"old").await.unwrap();
    let attr = fs.put(Path::new("album/V/a.jpg"), b"newer").await.unwrap();
    assert_eq!(attr.size, 5);

    assert_eq!(fs.read_all(Path::new("album/V/a.jpg")).await.unwrap(), b"newer");
    assert_eq!(fs.getattr(Path::new("album/V/a.jpg")).await.unwrap().size, 5);
    let entries = fs.readdir(Path::new("album/V")).await.unwrap();
    assert_eq!(names(&entries), vec!["a.jpg"]);
}

#[tokio::test]
async fn put_twice_replaces_in_memory_store() {
    assert_put_replaces(&memory_backend()).await;
}

#[tokio::test]
async fn put_twice_replaces_on_disk() {
    let (_dir, fs) = dir_backend("");
    assert_put_replaces(&fs).await;
}

/// Listing metadata agrees with a getattr of each entry.
async fn assert_listing_attrs_match_getattr(fs: &PhotoBackend) {
    fs.mkdir(Path::new("album/Trip")).await.unwrap();
    fs.put(Path::new("album/Trip/a.png"), b"png").await.unwrap();
    fs.put(Path::new("album/Trip/b.jpg"), b"jpeg!").await.unwrap();

    for dir in ["", "album", "album/Trip"] {
        for (entry, attr) in fs.readdir_attrs(Path::new(dir)).await.unwrap() {
            let path = Path::new(dir).join(&entry.name);
            let stat = fs.getattr(&path).await.unwrap();
            assert_eq!(attr.kind, stat.kind, "{}", path.display());
            assert_eq!(attr.size, stat.size, "{}", path.display());
            assert_eq!(attr.mtime, stat.mtime, "{}", path.display());
            assert_eq!(attr.id, stat.id, "{}", path.display());
            assert_eq!(attr.items, stat.items, "{}", path.display());
            assert_eq!(attr.mime_type, stat.mime_type, "{}", path.display());
        }
    }

    let albums = fs.readdir_attrs(Path::new("album")).await.unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].1.items, Some(2));

    let photos = fs.readdir_attrs(Path::new("album/Trip")).await.unwrap();
    let mimes: Vec<_> = photos
        .iter()
        .map(|(_, attr)| attr.mime_type.as_deref())
        .collect();
    assert_eq!(mimes, vec![Some("image/png"), Some("image/jpeg")]);
}

#[tokio::test]
async fn listing_attrs_match_getattr_in_memory_store() {
    assert_listing_attrs_match_getattr(&memory_backend()).await;
}

#[tokio::test]
async fn listing_attrs_match_getattr_on_disk() {
    let (_dir, fs) = dir_backend("");
    assert_listing_attrs_match_getattr(&fs).await;
}
