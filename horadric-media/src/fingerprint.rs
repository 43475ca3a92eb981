//! Content fingerprints and the storage keys derived from them.

use image::ImageFormat;
use sha2::{Digest, Sha256};

/// Prefix under which item images are stored.
pub const ITEM_KEY_PREFIX: &str = "items";

/// Lowercase hex SHA-256 of `bytes`.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// File extension for image bytes, sniffed from their content.
pub fn image_extension(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "png",
        Ok(ImageFormat::Jpeg) => "jpg",
        Ok(ImageFormat::Gif) => "gif",
        Ok(ImageFormat::WebP) => "webp",
        _ => "bin",
    }
}

pub fn content_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// An image identified by its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    /// SHA-256 hex of `bytes`.
    pub hash: String,
    pub extension: &'static str,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>) -> Self {
        let hash = fingerprint(&bytes);
        let extension = image_extension(&bytes);
        Self {
            bytes,
            hash,
            extension,
        }
    }

    /// `items/<hash>.<ext>`. Equal content always yields an equal key.
    pub fn key(&self) -> String {
        format!("{ITEM_KEY_PREFIX}/{}.{}", self.hash, self.extension)
    }

    pub fn content_type(&self) -> &'static str {
        content_type(self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn known_digest() {
        assert_eq!(
            fingerprint(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn key_from_content() {
        let a = ImageAsset::new(PNG_MAGIC.to_vec());
        let b = ImageAsset::new(PNG_MAGIC.to_vec());
        assert_eq!(a.extension, "png");
        assert_eq!(a.key(), b.key());
        assert!(a.key().starts_with("items/"));
        assert!(a.key().ends_with(".png"));
        assert_eq!(a.content_type(), "image/png");
    }

    #[test]
    fn unknown_bytes() {
        let asset = ImageAsset::new(b"plain text".to_vec());
        assert_eq!(asset.extension, "bin");
        assert_eq!(asset.content_type(), "application/octet-stream");
    }
}
