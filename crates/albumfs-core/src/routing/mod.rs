//! Path-pattern routing.
//!
//! Maps a virtual path onto the fixed layout
//!
//! ```text
//! ""                        root            (dir)   lists album, playlist
//! album                     kind root       (dir)   lists album collections
//! album/<name>              collection      (dir)   lists photos; mkdir/rmdir here
//! album/<name>/<item>       item            (file)  upload/read/delete here
//! playlist/...              same shape for playlists
//! ```
//!
//! and decides what is legal there. Resolution is pure and synchronous: the
//! [`PatternTable`] is compiled once and can be shared across threads.

mod kind;
mod lister;
pub mod path;
mod pattern;
mod router;

pub use kind::CollectionKind;
pub use lister::{ListEntry, Lister};
pub use pattern::{PatternTable, Role, Rule, RuleSpec, RoutingError, Style};
pub use router::RouteMatch;
