pub(crate) mod composites;
pub(crate) mod config;
pub(crate) mod dedupe;
pub(crate) mod images;
pub(crate) mod import;
pub(crate) mod resolve;
pub(crate) mod stats;

use std::path::PathBuf;
use std::time::Duration;

use horadric_import::{CompositeStats, DedupeDetail, ImageStats, ImportIssue, Settings};
use horadric_media::{HttpFetcher, LocalBlobStore};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use crate::CliError;
use crate::progress::BarProgress;

/// Issues listed one by one before the rest are summarized.
const MAX_LISTED_ISSUES: usize = 25;

/// Settings plus the global flags that override them.
pub(crate) struct Context {
    pub settings: Settings,
    pub db: Option<PathBuf>,
    pub blob_root: Option<PathBuf>,
    pub quiet: bool,
}

impl Context {
    pub(crate) fn database_path(&self) -> PathBuf {
        self.settings.database_path(self.db.clone())
    }

    /// Open (creating if needed) the catalog database.
    pub(crate) fn open_catalog(&self) -> Result<Connection, CliError> {
        let path = self.database_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        horadric_db::open_database(&path).map_err(|e| {
            CliError::database(format!(
                "Failed to open catalog database at {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub(crate) fn blob_store(&self) -> Result<LocalBlobStore, CliError> {
        let root = self.settings.blob_root(self.blob_root.clone());
        let base_url = self.settings.blob_base_url(&root);
        LocalBlobStore::open(&root, &base_url).map_err(|e| CliError::blobs(e.to_string()))
    }

    pub(crate) fn fetcher(&self) -> Result<HttpFetcher, CliError> {
        HttpFetcher::new(Duration::from_secs(self.settings.fetch_timeout_secs))
            .map_err(|e| CliError::blobs(format!("Failed to create HTTP client: {}", e)))
    }

    pub(crate) fn progress(&self) -> BarProgress {
        BarProgress::new(self.quiet)
    }
}

// ── Output ──────────────────────────────────────────────────────────────────

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_heading(title: &str) {
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
}

pub(crate) fn print_dry_run_notice(dry_run: bool) {
    if dry_run {
        log::info!(
            "{}",
            "Dry run: nothing was written".if_supports_color(Stdout, |t| t.cyan()),
        );
    }
}

pub(crate) fn print_issues(issues: &[ImportIssue]) {
    if issues.is_empty() {
        return;
    }
    crate::log_blank();
    log::warn!("{} issue(s):", issues.len());
    for issue in issues.iter().take(MAX_LISTED_ISSUES) {
        log::warn!(
            "  [{}] {}: {}",
            issue.kind.as_str().if_supports_color(Stdout, |t| t.yellow()),
            issue.subject,
            issue.message,
        );
    }
    if issues.len() > MAX_LISTED_ISSUES {
        log::warn!("  ... and {} more", issues.len() - MAX_LISTED_ISSUES);
    }
}

pub(crate) fn print_image_stats(stats: &ImageStats) {
    log::info!("  Uploaded:       {:>8}", stats.uploaded);
    log::info!("  Reused:         {:>8}", stats.reused);
    log::info!("  Already set:    {:>8}", stats.already_set);
    log::info!("  Not found:      {:>8}", stats.not_found);
    if stats.missing_file > 0 {
        log::info!("  Missing file:   {:>8}", stats.missing_file);
    }
    if stats.failed > 0 {
        log::info!(
            "  Failed:         {:>8}",
            stats.failed.if_supports_color(Stdout, |t| t.red())
        );
    }
    if stats.planned > 0 {
        log::info!("  Planned:        {:>8}", stats.planned);
    }
}

pub(crate) fn print_composite_stats(stats: &CompositeStats) {
    log::info!("  Created:        {:>8}", stats.created);
    log::info!("  Kept:           {:>8}", stats.kept);
    if stats.missing_rune_icon > 0 {
        log::info!("  Missing runes:  {:>8}", stats.missing_rune_icon);
    }
    if stats.failed > 0 {
        log::info!(
            "  Failed:         {:>8}",
            stats.failed.if_supports_color(Stdout, |t| t.red())
        );
    }
    if stats.planned > 0 {
        log::info!("  Planned:        {:>8}", stats.planned);
    }
}

pub(crate) fn print_duplicates(details: &[DedupeDetail]) {
    for d in details {
        let ids: Vec<String> = d.removed_ids.iter().map(|id| id.to_string()).collect();
        log::debug!(
            "  {} '{}': kept {} #{}, removed {} #{}",
            d.reason.as_str(),
            d.name,
            d.kept_kind,
            d.kept_id,
            d.removed_kind,
            ids.join(", #"),
        );
    }
}
