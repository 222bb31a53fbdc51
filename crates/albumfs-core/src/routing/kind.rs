//! Remote collection kinds.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::EnumString;

/// Kind of remote collection.
///
/// Each kind owns one top-level directory named after [`as_str`](Self::as_str).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum CollectionKind {
    /// Unordered named set of photos.
    #[strum(serialize = "album", serialize = "albums")]
    Album,
    /// Ordered named set of photos.
    #[strum(serialize = "playlist", serialize = "playlists")]
    Playlist,
}

impl CollectionKind {
    /// Both kinds, in root-listing order.
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Album, CollectionKind::Playlist];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Top-level directory name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Album => "album",
            CollectionKind::Playlist => "playlist",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
