//! Import game tables and scraped pages into the item catalog database.
//!
//! This crate owns all reconciliation logic: resolving property text into
//! stat codes, matching items by name, storing images, building runeword
//! composites, and removing duplicate rows. [`run_import`] runs the whole
//! pipeline; each phase is also available on its own.

pub mod dedupe;
pub mod error;
pub mod images;
pub mod items;
pub mod orchestrator;
pub mod progress;
pub mod property;
pub mod registry;
pub mod report;
pub mod runewords;
pub mod settings;

pub use dedupe::{
    DedupeDetail, DedupeOptions, DedupeResult, DedupeStats, DuplicateReason, dedupe_catalog,
};
pub use error::ImportError;
pub use images::{
    ImageOutcome, ImagePhase, ImagePipeline, ImageSources, ImageStats, SourceLookup, StoredImage,
    run_images,
};
pub use items::{
    ImportedItem, ItemAction, ItemImporter, ItemOrigin, KindStats, resolve_properties,
};
pub use orchestrator::{DEFAULT_IMAGE_MAP, ImportOptions, load_image_map, run_import};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use property::{PropertyResolver, extract_value, template_key};
pub use registry::{RegistryError, StatRegistry};
pub use report::{Deadline, ImportIssue, ImportReport, IssueKind};
pub use runewords::{
    CompositeOutcome, CompositePhase, CompositeStats, RuneIcons, build_composite, run_composites,
};
pub use settings::{Settings, SettingsError, load_settings, load_settings_string, settings_path};
