//! Virtual Filesystem abstraction.
//!
//! - [`VfsOps`] - Core trait for filesystem operations
//! - [`VfsError`] - Error taxonomy shared by every backend
//!
//! ## Design Decisions
//!
//! - **Path-based, no inodes**: Operations use paths, not inode numbers.
//! - **Whole objects**: Photos are uploaded in one `put`; reads take an
//!   explicit offset/size so callers can page through large files.

mod error;
mod ops;
mod types;

pub use error::{VfsError, VfsResult};
pub use ops::VfsOps;
pub use types::{DirEntry, FileAttr, FileType};
