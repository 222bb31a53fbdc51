//! RON configuration.
//!
//! ```ron
//! (
//!     root: "album",
//!     store: Directory(path: "/srv/photos"),
//!     read_only: false,
//! )
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::backend::PhotoBackend;
use crate::remote::{DirPhotoService, MemoryPhotoService, PhotoService};
use crate::routing::PatternTable;

/// Where photos are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreConfig {
    /// Ephemeral, lost on exit.
    Memory,
    /// One directory per collection under `path`.
    Directory { path: PathBuf },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Directory {
            path: default_data_dir(),
        }
    }
}

/// albumfs configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumFsConfig {
    /// Virtual path the filesystem is mounted at (`""` is the top).
    pub root: String,
    pub store: StoreConfig,
    pub read_only: bool,
}

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON encode error: {0}")]
    Encode(#[from] ron::Error),
}

/// `$XDG_DATA_HOME/albumfs`, or `./albumfs` when there is no data dir.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("albumfs")
}

/// `$XDG_CONFIG_HOME/albumfs/config.ron`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("albumfs").join("config.ron"))
}

impl AlbumFsConfig {
    /// Parse a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Render as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Load `path`, or the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "loading config");
                    Self::load(&path)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    /// Build the photo service this config names.
    pub fn build_service(&self) -> Arc<dyn PhotoService> {
        match &self.store {
            StoreConfig::Memory => Arc::new(MemoryPhotoService::new()),
            StoreConfig::Directory { path } => Arc::new(DirPhotoService::new(path)),
        }
    }

    /// Build a backend over `service` using this config's root and mode.
    pub fn build_backend(
        &self,
        table: Arc<PatternTable>,
        service: Arc<dyn PhotoService>,
    ) -> PhotoBackend {
        PhotoBackend::new(&self.root, table, service).with_read_only(self.read_only)
    }
}
