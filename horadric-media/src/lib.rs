//! Image handling for the item catalog: blob storage, fetching,
//! content fingerprints, and runeword composite icons.

pub mod blob;
pub mod composite;
pub mod composite_layout;
pub mod error;
pub mod fetch;
pub mod fingerprint;

pub use blob::{BlobStore, LocalBlobStore, MemoryBlobStore, ReadOnlyBlobStore};
pub use composite::{decode_icon, render_composite};
pub use composite_layout::{CompositeConfig, CompositeLayout, MAX_RUNES};
pub use error::MediaError;
pub use fetch::{HttpFetcher, ImageFetcher, ImageSource, LocalFetcher, resolve_url};
pub use fingerprint::{ImageAsset, content_type, fingerprint, image_extension};
