//! The full import run.
//!
//! Phases run in a fixed order: registry setup, tables, HTML pages, images,
//! runeword composites, duplicate cleanup, and finally the import log row.
//! Setup failures abort the run. Everything after setup records per-item
//! problems in the report and carries on.
//!
//! Each phase commits on its own. A dry run instead wraps the whole run in
//! one transaction that is rolled back, and refuses every blob write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use horadric_catalog::{ImportLog, ItemKind, load_classes};
use horadric_db::insert_import_log;
use horadric_media::{BlobStore, CompositeConfig, ImageFetcher, ReadOnlyBlobStore};
use horadric_source::{
    HtmlSelectors, ImageMap, SourceItem, TableKind, parse_html_file, read_tables_dir,
};
use rusqlite::Connection;

use crate::dedupe::{DedupeOptions, dedupe_catalog};
use crate::error::{ImportError, with_transaction};
use crate::images::{ImagePipeline, ImageSources, run_images};
use crate::items::{ItemImporter, ItemOrigin};
use crate::progress::ImportProgress;
use crate::property::PropertyResolver;
use crate::registry::StatRegistry;
use crate::report::{Deadline, ImportIssue, ImportReport, IssueKind};
use crate::runewords::run_composites;

/// Manifest file name looked for in the image directory.
pub const DEFAULT_IMAGE_MAP: &str = "images.tsv";

/// Options controlling a full import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Directory holding the game's tab-delimited tables.
    pub tables_dir: Option<PathBuf>,
    /// Scraped listing pages.
    pub html_files: Vec<PathBuf>,
    /// Kind of HTML items without a `data-kind`.
    pub html_kind: ItemKind,
    pub selectors: HtmlSelectors,
    /// Directory of class skill-tree YAML files.
    pub classes_dir: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    /// Image manifest; defaults to [`DEFAULT_IMAGE_MAP`] in `image_dir`.
    pub image_map: Option<PathBuf>,
    /// Base URL that HTML image paths are relative to.
    pub image_base_url: Option<String>,
    pub composite: CompositeConfig,
    /// Report without changing the catalog or the blob store.
    pub dry_run: bool,
    /// Re-upload images for rows that already have one.
    pub force_images: bool,
    /// Rebuild composites for runewords that already have an image.
    pub regenerate_composites: bool,
    /// No new item is started once this much time has passed.
    pub timeout: Option<Duration>,
}

impl ImportOptions {
    /// Manifest path to load, if an image directory is configured.
    pub fn image_map_path(&self) -> Option<PathBuf> {
        self.image_map
            .clone()
            .or_else(|| self.image_dir.as_ref().map(|d| d.join(DEFAULT_IMAGE_MAP)))
    }

    fn source_name(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(dir) = &self.tables_dir {
            parts.push(dir.display().to_string());
        }
        parts.extend(self.html_files.iter().map(|p| p.display().to_string()));
        if parts.is_empty() {
            "(none)".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Load an image manifest for an import run. A configured but absent
/// manifest is logged and ignored.
pub fn load_image_map(options: &ImportOptions) -> Result<Option<ImageMap>, ImportError> {
    let Some(manifest) = options.image_map_path() else {
        return Ok(None);
    };
    if !manifest.is_file() {
        log::warn!("Image manifest {} not found; skipping image map", manifest.display());
        return Ok(None);
    }
    let image_dir = options
        .image_dir
        .clone()
        .or_else(|| manifest.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let map = ImageMap::load(&manifest, &image_dir)?;
    log::info!("Loaded {} image mappings from {}", map.len(), manifest.display());
    Ok(Some(map))
}

/// Run a full import.
///
/// Returns an error only when setup fails. On a dry run the database is left
/// exactly as it was, whatever happens.
pub fn run_import(
    conn: &Connection,
    blobs: &dyn BlobStore,
    fetcher: &dyn ImageFetcher,
    options: &ImportOptions,
    progress: &dyn ImportProgress,
) -> Result<ImportReport, ImportError> {
    if !options.dry_run {
        return run_phases(conn, blobs, fetcher, options, progress);
    }

    let read_only = ReadOnlyBlobStore::new(blobs);
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = run_phases(conn, &read_only, fetcher, options, progress);
    conn.execute_batch("ROLLBACK")?;

    result.map(|mut report| {
        report.log_id = None;
        report
    })
}

fn run_phases(
    conn: &Connection,
    blobs: &dyn BlobStore,
    fetcher: &dyn ImageFetcher,
    options: &ImportOptions,
    progress: &dyn ImportProgress,
) -> Result<ImportReport, ImportError> {
    let deadline = Deadline::from_timeout(options.timeout);
    let mut report = ImportReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    // ── Setup ───────────────────────────────────────────────────────────────
    progress.on_phase("Loading stat registry");
    let mut registry = StatRegistry::load(conn)?;
    report.stats_seeded = registry.seed_from_builtins(conn)?;
    if let Some(dir) = &options.classes_dir {
        let classes = load_classes(dir)?;
        report.stats_seeded += registry.seed_from_classes(conn, &classes)?;
        log::info!("Loaded {} classes from {}", classes.len(), dir.display());
    }
    log::info!(
        "Stat registry: {} codes ({} seeded)",
        registry.count(),
        report.stats_seeded
    );
    let image_map = load_image_map(options)?;
    if let Some(map) = &image_map {
        report.errors.extend(map.errors.iter().map(ImportIssue::from));
    }

    let mut resolver = PropertyResolver::new(&registry);
    let mut importer = ItemImporter::new();
    let mut declared: HashMap<(ItemKind, i64), String> = HashMap::new();

    // ── Tables ──────────────────────────────────────────────────────────────
    if let Some(dir) = &options.tables_dir {
        let tables = read_tables_dir(dir).unwrap_or_else(|e| {
            log::warn!("Skipping tables in {}: {e}", dir.display());
            report.errors.push(ImportIssue::new(
                IssueKind::Parse,
                dir.display().to_string(),
                e.to_string(),
            ));
            Vec::new()
        });
        for table in tables {
            if report.timed_out {
                break;
            }
            let table = match table {
                Ok(table) => table,
                Err(failure) => {
                    report.errors.push(ImportIssue::new(
                        IssueKind::Parse,
                        failure.file_name,
                        failure.error.to_string(),
                    ));
                    continue;
                }
            };
            progress.on_phase(&format!("Importing {}", table.file_name));
            report.errors.extend(table.errors.iter().map(ImportIssue::from));
            report.items.entry(table_item_kind(table.kind)).or_default().skipped += table.skipped;
            import_items(
                conn,
                &table.items,
                ItemOrigin::Table,
                &mut importer,
                &mut resolver,
                &deadline,
                progress,
                &mut report,
                &mut declared,
            )?;
        }
    }

    // ── HTML pages ──────────────────────────────────────────────────────────
    for path in &options.html_files {
        if report.timed_out {
            break;
        }
        progress.on_phase(&format!("Importing {}", path.display()));
        let items = match parse_html_file(path, &options.selectors, options.html_kind) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                report.errors.push(ImportIssue::new(
                    IssueKind::Parse,
                    path.display().to_string(),
                    e.to_string(),
                ));
                continue;
            }
        };
        import_items(
            conn,
            &items,
            ItemOrigin::Page,
            &mut importer,
            &mut resolver,
            &deadline,
            progress,
            &mut report,
            &mut declared,
        )?;
    }

    report.missing_stat_codes = resolver.into_missing().into_iter().collect();

    let pipeline = ImagePipeline::new(blobs, fetcher)
        .force(options.force_images)
        .dry_run(options.dry_run);

    // ── Images ──────────────────────────────────────────────────────────────
    let sources = ImageSources {
        declared,
        base_url: options.image_base_url.as_deref(),
        image_map: image_map.as_ref(),
    };
    if !report.timed_out && !sources.is_empty() {
        let phase = run_images(conn, &pipeline, &sources, &deadline, progress)?;
        report.images = phase.stats;
        report.missing_images = phase.missing;
        report.errors.extend(phase.errors);
        if phase.timed_out {
            report.record_timeout("images");
        }
    }

    // ── Composites ──────────────────────────────────────────────────────────
    if !report.timed_out {
        let phase = run_composites(
            conn,
            &pipeline,
            &options.composite,
            options.regenerate_composites,
            &deadline,
            progress,
        )?;
        report.composites = phase.stats;
        report.errors.extend(phase.errors);
        if phase.timed_out {
            report.record_timeout("composites");
        }
    }

    // ── Duplicate cleanup ───────────────────────────────────────────────────
    if !report.timed_out {
        progress.on_phase("Removing duplicates");
        let dedupe = dedupe_catalog(
            conn,
            &DedupeOptions {
                dry_run: options.dry_run,
            },
        )?;
        report.dedupe = dedupe.stats;
        report.duplicates = dedupe.details;
        report.errors.extend(dedupe.errors);
    }

    // ── Import log ──────────────────────────────────────────────────────────
    let log = ImportLog {
        id: 0,
        source_type: "import".to_string(),
        source_name: options.source_name(),
        imported_at: chrono::Utc::now().to_rfc3339(),
        records_created: report.total_imported() as i64,
        records_updated: report.total_renamed() as i64,
        records_unchanged: report.total_unchanged() as i64,
        errors: report.errors.len() as i64,
    };
    report.log_id = Some(insert_import_log(conn, &log)?);

    progress.on_complete(&format!(
        "Import complete: {} new, {} renamed, {} unchanged, {} issues{}",
        log.records_created,
        log.records_updated,
        log.records_unchanged,
        log.errors,
        if report.timed_out { " (timed out)" } else { "" },
    ));

    Ok(report)
}

/// Kind most rows of a table map to. Misc rows are split across kinds.
fn table_item_kind(kind: TableKind) -> ItemKind {
    match kind {
        TableKind::Weapons | TableKind::Armor | TableKind::Misc => ItemKind::Base,
        TableKind::UniqueItems => ItemKind::Unique,
        TableKind::SetItems => ItemKind::Set,
        TableKind::Runes => ItemKind::Runeword,
    }
}

/// Import one batch of items in a single transaction.
#[allow(clippy::too_many_arguments)]
fn import_items(
    conn: &Connection,
    items: &[SourceItem],
    origin: ItemOrigin,
    importer: &mut ItemImporter,
    resolver: &mut PropertyResolver<'_>,
    deadline: &Deadline,
    progress: &dyn ImportProgress,
    report: &mut ImportReport,
    declared: &mut HashMap<(ItemKind, i64), String>,
) -> Result<(), ImportError> {
    let total = items.len();
    with_transaction(conn, || -> Result<(), ImportError> {
        for (i, item) in items.iter().enumerate() {
            if deadline.expired() {
                report.record_timeout(&item.source);
                break;
            }
            match importer.import(conn, item, origin, resolver) {
                Ok(imported) => {
                    report.items.entry(item.kind).or_default().record(&imported);
                    if let Some(path) = &item.image {
                        declared
                            .entry((item.kind, imported.id))
                            .or_insert_with(|| path.clone());
                    }
                }
                Err(e) => {
                    log::warn!("Failed to import {} '{}': {e}", item.kind, item.name);
                    report.items.entry(item.kind).or_default().skipped += 1;
                    report.errors.push(ImportIssue::new(
                        IssueKind::Database,
                        format!("{} '{}'", item.kind, item.name),
                        e.to_string(),
                    ));
                }
            }
            progress.on_item(i + 1, total, &item.name);
        }
        Ok(())
    })
}
