//! Remote collection and photo records.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use super::error::{RemoteError, RemoteResult};
use crate::routing::CollectionKind;

/// A remote collection (album or playlist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub kind: CollectionKind,
    pub name: String,
    pub photo_count: u64,
    pub created: SystemTime,
}

/// A photo stored in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub collection_id: String,
    pub filename: String,
    pub size: u64,
    pub mime_type: String,
    pub modified: SystemTime,
}

/// Upload request.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl NewPhoto {
    /// Build an upload, guessing the mime type from the filename.
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = guess_mime_type(&filename).to_string();
        Self {
            filename,
            mime_type,
            data,
        }
    }
}

/// Mime type for common photo and video extensions.
pub fn guess_mime_type(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// Reject names that cannot be a single path segment.
pub fn validate_name(name: &str) -> RemoteResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
        return Err(RemoteError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("img1.jpg"), "image/jpeg");
        assert_eq!(guess_mime_type("IMG_0001.JPEG"), "image/jpeg");
        assert_eq!(guess_mime_type("clip.mov"), "video/quicktime");
        assert_eq!(guess_mime_type("notes"), "application/octet-stream");
        assert_eq!(guess_mime_type("archive.tar.gz"), "application/octet-stream");
    }

    #[test]
    fn test_new_photo_guesses_mime() {
        let photo = NewPhoto::new("a.png", vec![1, 2, 3]);
        assert_eq!(photo.mime_type, "image/png");
        assert_eq!(photo.data.len(), 3);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Vacation 2024").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
    }
}
