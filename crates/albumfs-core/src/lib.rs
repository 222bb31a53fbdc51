//! # albumfs-core
//!
//! Remote photo collections exposed as a filesystem.
//!
//! A path such as `album/Vacation/img1.jpg` is resolved against a small,
//! fixed [`PatternTable`]; the rule that matches says what the path *is*
//! (root, collection-kind root, collection, photo) and therefore what may be
//! done there. [`PhotoBackend`] glues that routing to a [`PhotoService`] and
//! presents the result through [`VfsOps`].
//!
//! ```
//! use albumfs_core::{PatternTable, Role, Style};
//!
//! let table = PatternTable::builtin();
//! let m = table.resolve("", "album/Vacation/img1.jpg", Style::File).unwrap();
//! assert_eq!(m.role(), Role::Item);
//! assert_eq!(m.collection(), Some("Vacation"));
//! assert_eq!(m.item(), Some("img1.jpg"));
//! assert!(m.rule.can_upload());
//! ```

pub mod backend;
pub mod config;
pub mod remote;
pub mod routing;
pub mod vfs;

pub use backend::{OpenedRoot, PhotoBackend};
pub use config::{AlbumFsConfig, ConfigError, StoreConfig};
pub use remote::{
    Collection, DirPhotoService, MemoryPhotoService, NewPhoto, Photo, PhotoService, RemoteError,
    RemoteResult,
};
pub use routing::{
    CollectionKind, ListEntry, Lister, PatternTable, Role, RouteMatch, RoutingError, Rule,
    RuleSpec, Style,
};
pub use vfs::{DirEntry, FileAttr, FileType, VfsError, VfsOps, VfsResult};
