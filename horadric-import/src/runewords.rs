//! Runeword composite icons.
//!
//! A runeword has no art of its own; its icon is built from the icons of
//! its runes, in socket order. Rune icons are read back from the blob store
//! by each rune row's stored key.

use std::collections::HashMap;

use horadric_catalog::{CatalogItem, ItemKind, MatchPolicy, NameIndex};
use horadric_db::{OperationError, list_items, update_item_image};
use horadric_media::{CompositeConfig, CompositeLayout, decode_icon, render_composite};
use rusqlite::Connection;
use serde::Serialize;

use crate::error::{ImportError, with_transaction};
use crate::images::{ImagePipeline, StoredImage};
use crate::progress::ImportProgress;
use crate::report::{Deadline, ImportIssue, IssueKind};

/// What happened to one runeword's composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeOutcome {
    Created {
        layout: CompositeLayout,
        image: StoredImage,
    },
    /// The runeword already has an image and regeneration wasn't forced.
    Kept,
    /// Dry run: a composite with this layout would be rendered.
    Planned(CompositeLayout),
    /// The named rune has no stored icon.
    MissingRuneIcon(String),
    Failed(String),
}

/// Per-outcome counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeStats {
    pub created: usize,
    pub kept: usize,
    pub planned: usize,
    pub missing_rune_icon: usize,
    pub failed: usize,
}

impl CompositeStats {
    pub fn record(&mut self, outcome: &CompositeOutcome) {
        match outcome {
            CompositeOutcome::Created { .. } => self.created += 1,
            CompositeOutcome::Kept => self.kept += 1,
            CompositeOutcome::Planned(_) => self.planned += 1,
            CompositeOutcome::MissingRuneIcon(_) => self.missing_rune_icon += 1,
            CompositeOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Rune icon keys, by rune code and by name.
#[derive(Debug, Default)]
pub struct RuneIcons {
    by_code: HashMap<String, Option<String>>,
    by_name: NameIndex<Option<String>>,
}

impl RuneIcons {
    /// Read every rune row.
    pub fn load(conn: &Connection) -> Result<Self, OperationError> {
        let mut icons = Self::default();
        for rune in list_items(conn, ItemKind::Rune)? {
            if let Some(code) = &rune.code {
                icons
                    .by_code
                    .entry(code.clone())
                    .or_insert_with(|| rune.image_key.clone());
            }
            icons.by_name.insert(&rune.name, rune.image_key.clone());
        }
        Ok(icons)
    }

    /// Icon key for a rune reference: a rune code, or failing that, a rune
    /// name matched exactly.
    pub fn key_for(&self, rune: &str) -> Option<&str> {
        let key = match self.by_code.get(rune) {
            Some(key) => key,
            None => self.by_name.find(rune, MatchPolicy::ExactOnly)?.value,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Build (or plan) the composite for one runeword.
pub fn build_composite(
    conn: &Connection,
    pipeline: &ImagePipeline<'_>,
    icons: &RuneIcons,
    runeword: &CatalogItem,
    config: &CompositeConfig,
    force: bool,
) -> CompositeOutcome {
    if runeword.has_image() && !force {
        return CompositeOutcome::Kept;
    }

    let layout = match CompositeLayout::for_count(runeword.runes.len()) {
        Ok(layout) => layout,
        Err(e) => return CompositeOutcome::Failed(e.to_string()),
    };

    let mut keys = Vec::with_capacity(runeword.runes.len());
    for rune in &runeword.runes {
        match icons.key_for(rune) {
            Some(key) => keys.push(key),
            None => return CompositeOutcome::MissingRuneIcon(rune.clone()),
        }
    }

    if pipeline.is_dry_run() {
        return CompositeOutcome::Planned(layout);
    }

    let mut decoded = Vec::with_capacity(keys.len());
    for (rune, key) in runeword.runes.iter().zip(keys) {
        let bytes = match pipeline.blobs().get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return CompositeOutcome::MissingRuneIcon(rune.clone()),
            Err(e) => return CompositeOutcome::Failed(format!("read icon of {rune}: {e}")),
        };
        match decode_icon(&bytes) {
            Ok(icon) => decoded.push(icon),
            Err(e) => return CompositeOutcome::Failed(format!("decode icon of {rune}: {e}")),
        }
    }

    let png = match render_composite(&decoded, config) {
        Ok(png) => png,
        Err(e) => return CompositeOutcome::Failed(format!("render: {e}")),
    };

    let image = match pipeline.store(png) {
        Ok((image, _)) => image,
        Err(e) => return CompositeOutcome::Failed(format!("store: {e}")),
    };

    if let Err(e) = update_item_image(conn, ItemKind::Runeword, runeword.id, &image.url, &image.key) {
        return CompositeOutcome::Failed(format!("update row: {e}"));
    }

    log::debug!("Composite for '{}': {layout}", runeword.name);
    CompositeOutcome::Created { layout, image }
}

/// Result of a composite phase.
#[derive(Debug, Default)]
pub struct CompositePhase {
    pub stats: CompositeStats,
    pub errors: Vec<ImportIssue>,
    pub timed_out: bool,
}

/// Build composites for every runeword.
pub fn run_composites(
    conn: &Connection,
    pipeline: &ImagePipeline<'_>,
    config: &CompositeConfig,
    force: bool,
    deadline: &Deadline,
    progress: &dyn ImportProgress,
) -> Result<CompositePhase, ImportError> {
    let mut phase = CompositePhase::default();

    let runewords = list_items(conn, ItemKind::Runeword)?;
    if runewords.is_empty() {
        return Ok(phase);
    }
    let icons = RuneIcons::load(conn)?;
    progress.on_phase(&format!("Composites: {} runewords", runewords.len()));

    with_transaction(conn, || -> Result<(), ImportError> {
        let total = runewords.len();
        for (i, runeword) in runewords.iter().enumerate() {
            if deadline.expired() {
                phase.timed_out = true;
                break;
            }
            let outcome = build_composite(conn, pipeline, &icons, runeword, config, force);
            phase.stats.record(&outcome);
            match &outcome {
                CompositeOutcome::MissingRuneIcon(rune) => {
                    log::warn!("Skipping '{}': no icon for rune {rune}", runeword.name);
                    phase.errors.push(ImportIssue::new(
                        IssueKind::MissingRuneIcon,
                        &runeword.name,
                        format!("no stored icon for rune {rune}"),
                    ));
                }
                CompositeOutcome::Failed(message) => {
                    log::warn!("Composite for '{}' failed: {message}", runeword.name);
                    phase.errors.push(ImportIssue::new(
                        IssueKind::UploadFailure,
                        &runeword.name,
                        message.clone(),
                    ));
                }
                _ => {}
            }
            progress.on_item(i + 1, total, &runeword.name);
        }
        Ok(())
    })?;

    Ok(phase)
}
