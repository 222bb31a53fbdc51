//! Remote photo collections.
//!
//! [`PhotoService`] is the seam to whatever actually stores the photos.
//! Two implementations ship with the crate:
//!
//! - [`MemoryPhotoService`] - ephemeral, for tests
//! - [`DirPhotoService`] - one directory per collection on local disk

mod error;
mod local;
mod memory;
mod service;
mod types;

pub use error::{RemoteError, RemoteResult};
pub use local::DirPhotoService;
pub use memory::MemoryPhotoService;
pub use service::PhotoService;
pub use types::{guess_mime_type, validate_name, Collection, NewPhoto, Photo};
