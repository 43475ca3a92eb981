//! The image pipeline: find an item's image, fingerprint it, store it once,
//! and attach the resulting URL to the row.
//!
//! Stored images are keyed by content, so identical images across items
//! share one blob and one URL. A per-run cache avoids even asking the store
//! about a fingerprint twice.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use horadric_catalog::{CatalogItem, ItemKind};
use horadric_db::{list_items, update_item_image};
use horadric_media::{BlobStore, ImageAsset, ImageFetcher, ImageSource, MediaError, resolve_url};
use horadric_source::{ImageLookup, ImageMap};
use rusqlite::Connection;
use serde::Serialize;

use crate::error::{ImportError, with_transaction};
use crate::progress::ImportProgress;
use crate::report::{Deadline, ImportIssue, IssueKind};

/// Kinds that get their image from a source. Runewords get composites.
pub const IMAGE_KINDS: [ItemKind; 6] = [
    ItemKind::Base,
    ItemKind::Rune,
    ItemKind::Gem,
    ItemKind::Quest,
    ItemKind::Unique,
    ItemKind::Set,
];

/// A blob the pipeline has stored (or found already stored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

/// What happened to one item's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// New bytes were written to the store.
    Uploaded(StoredImage),
    /// Identical content was already stored; its URL was reused.
    Reused(StoredImage),
    /// The row already has a URL and re-upload wasn't forced.
    AlreadySet,
    /// No source maps to the item.
    NotFound,
    /// The item is mapped, but the file is absent on disk.
    MissingFile(PathBuf),
    /// Fetching or storing failed; the row keeps its old URL.
    Failed(String),
    /// Dry run: the image would be fetched from this source.
    Planned(ImageSource),
}

/// Per-outcome counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImageStats {
    pub uploaded: usize,
    pub reused: usize,
    pub already_set: usize,
    pub not_found: usize,
    pub missing_file: usize,
    pub failed: usize,
    pub planned: usize,
}

impl ImageStats {
    pub fn record(&mut self, outcome: &ImageOutcome) {
        match outcome {
            ImageOutcome::Uploaded(_) => self.uploaded += 1,
            ImageOutcome::Reused(_) => self.reused += 1,
            ImageOutcome::AlreadySet => self.already_set += 1,
            ImageOutcome::NotFound => self.not_found += 1,
            ImageOutcome::MissingFile(_) => self.missing_file += 1,
            ImageOutcome::Failed(_) => self.failed += 1,
            ImageOutcome::Planned(_) => self.planned += 1,
        }
    }
}

/// Where an item's image bytes would come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLookup {
    Found(ImageSource),
    NotMapped,
    MissingFile(PathBuf),
    /// A declared path that can't be turned into a URL.
    Invalid(String),
}

/// Everything that can point at an item's image.
#[derive(Debug, Default)]
pub struct ImageSources<'a> {
    /// Image paths declared by HTML pages, by row.
    pub declared: HashMap<(ItemKind, i64), String>,
    /// Base URL declared paths are relative to.
    pub base_url: Option<&'a str>,
    pub image_map: Option<&'a ImageMap>,
}

impl ImageSources<'_> {
    /// True when no item could possibly be resolved.
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty() && self.image_map.is_none()
    }

    /// Resolve an item's image source. A page-declared path wins over the
    /// image map.
    pub fn lookup(&self, item: &CatalogItem) -> SourceLookup {
        if let Some(path) = self.declared.get(&(item.kind, item.id)) {
            return match self.base_url {
                Some(base) => match resolve_url(base, path) {
                    Ok(url) => SourceLookup::Found(ImageSource::Remote(url)),
                    Err(e) => SourceLookup::Invalid(e.to_string()),
                },
                None if path.starts_with("http://") || path.starts_with("https://") => {
                    SourceLookup::Found(ImageSource::Remote(path.clone()))
                }
                None => SourceLookup::Invalid(format!("no base URL to resolve '{path}' against")),
            };
        }

        match self.image_map.map(|m| m.lookup(&item.name)) {
            Some(ImageLookup::Found(path)) => SourceLookup::Found(ImageSource::Local(path)),
            Some(ImageLookup::Missing(path)) => SourceLookup::MissingFile(path),
            Some(ImageLookup::NotMapped) | None => SourceLookup::NotMapped,
        }
    }
}

/// Fetches, fingerprints, and stores images.
pub struct ImagePipeline<'a> {
    blobs: &'a dyn BlobStore,
    fetcher: &'a dyn ImageFetcher,
    /// Fingerprint to stored blob, for this run.
    cache: Mutex<HashMap<String, StoredImage>>,
    force: bool,
    dry_run: bool,
}

impl<'a> ImagePipeline<'a> {
    pub fn new(blobs: &'a dyn BlobStore, fetcher: &'a dyn ImageFetcher) -> Self {
        Self {
            blobs,
            fetcher,
            cache: Mutex::new(HashMap::new()),
            force: false,
            dry_run: false,
        }
    }

    /// Re-upload even when a row or the store already has the image.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Resolve sources and report, without fetching or writing anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn blobs(&self) -> &'a dyn BlobStore {
        self.blobs
    }

    /// Store image bytes under their content key.
    ///
    /// Returns the stored image and whether bytes were written. Content seen
    /// earlier in the run, or already present in the store, is not written
    /// again unless forced.
    pub fn store(&self, bytes: Vec<u8>) -> Result<(StoredImage, bool), MediaError> {
        let asset = ImageAsset::new(bytes);
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(stored) = cache.get(&asset.hash) {
            return Ok((stored.clone(), false));
        }

        let key = asset.key();
        let written = if !self.force && self.blobs.exists(&key)? {
            log::debug!("Blob {key} already stored");
            false
        } else {
            self.blobs.put(&key, &asset.bytes, asset.content_type())?;
            true
        };

        let stored = StoredImage {
            url: self.blobs.public_url(&key),
            key,
        };
        cache.insert(asset.hash, stored.clone());
        Ok((stored, written))
    }

    /// Run one item through the pipeline.
    pub fn process(&self, conn: &Connection, item: &CatalogItem, lookup: SourceLookup) -> ImageOutcome {
        if item.has_image() && !self.force {
            return ImageOutcome::AlreadySet;
        }

        let source = match lookup {
            SourceLookup::Found(source) => source,
            SourceLookup::NotMapped => return ImageOutcome::NotFound,
            SourceLookup::MissingFile(path) => return ImageOutcome::MissingFile(path),
            SourceLookup::Invalid(message) => return ImageOutcome::Failed(message),
        };

        if self.dry_run {
            return ImageOutcome::Planned(source);
        }

        let bytes = match self.fetcher.fetch(&source) {
            Ok(bytes) => bytes,
            Err(e) => return ImageOutcome::Failed(format!("fetch {source}: {e}")),
        };

        let (stored, written) = match self.store(bytes) {
            Ok(result) => result,
            Err(e) => return ImageOutcome::Failed(format!("store: {e}")),
        };

        if let Err(e) = update_item_image(conn, item.kind, item.id, &stored.url, &stored.key) {
            return ImageOutcome::Failed(format!("update row: {e}"));
        }

        if written {
            ImageOutcome::Uploaded(stored)
        } else {
            ImageOutcome::Reused(stored)
        }
    }
}

/// Result of an image phase.
#[derive(Debug, Default)]
pub struct ImagePhase {
    pub stats: ImageStats,
    /// Names of items no image was found for.
    pub missing: Vec<String>,
    pub errors: Vec<ImportIssue>,
    pub timed_out: bool,
}

/// Run every row of the image kinds through the pipeline, one at a time.
pub fn run_images(
    conn: &Connection,
    pipeline: &ImagePipeline<'_>,
    sources: &ImageSources<'_>,
    deadline: &Deadline,
    progress: &dyn ImportProgress,
) -> Result<ImagePhase, ImportError> {
    let mut phase = ImagePhase::default();

    for kind in IMAGE_KINDS {
        let items = list_items(conn, kind)?;
        if items.is_empty() {
            continue;
        }
        progress.on_phase(&format!("Images: {} {kind} items", items.len()));

        with_transaction(conn, || -> Result<(), ImportError> {
            let total = items.len();
            for (i, item) in items.iter().enumerate() {
                if deadline.expired() {
                    phase.timed_out = true;
                    break;
                }
                let outcome = pipeline.process(conn, item, sources.lookup(item));
                phase.stats.record(&outcome);
                match &outcome {
                    ImageOutcome::NotFound => phase.missing.push(item.name.clone()),
                    ImageOutcome::MissingFile(path) => {
                        phase.missing.push(item.name.clone());
                        phase.errors.push(ImportIssue::new(
                            IssueKind::NotFound,
                            &item.name,
                            format!("image file {} does not exist", path.display()),
                        ));
                    }
                    ImageOutcome::Failed(message) => {
                        log::warn!("Image for '{}' failed: {message}", item.name);
                        phase.errors.push(ImportIssue::new(
                            IssueKind::UploadFailure,
                            &item.name,
                            message.clone(),
                        ));
                    }
                    _ => {}
                }
                progress.on_item(i + 1, total, &item.name);
            }
            Ok(())
        })?;

        if phase.timed_out {
            break;
        }
    }

    Ok(phase)
}
