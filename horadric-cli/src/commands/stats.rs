use std::path::PathBuf;

use horadric_catalog::load_classes;
use horadric_import::StatRegistry;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{Context, print_heading, print_json};

const RECENT_IMPORTS: u32 = 5;

/// Seed the stat registry, then show catalog counts and recent imports.
pub(crate) fn run_stats(ctx: &Context, classes: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let conn = ctx.open_catalog()?;

    let mut registry = StatRegistry::load(&conn)?;
    let mut seeded = registry.seed_from_builtins(&conn)?;
    if let Some(dir) = classes.or_else(|| ctx.settings.sources.classes_dir.clone()) {
        let classes = load_classes(&dir)?;
        seeded += registry.seed_from_classes(&conn, &classes)?;
        log::debug!("Seeded skills for {} classes from {}", classes.len(), dir.display());
    }

    let stats = horadric_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;
    let logs = horadric_db::list_import_logs(&conn, Some(RECENT_IMPORTS))
        .map_err(|e| CliError::database(format!("Failed to read import log: {}", e)))?;

    if json {
        return print_json(&serde_json::json!({
            "seeded": seeded,
            "registry": registry.count(),
            "stats": stats,
            "recent_imports": logs,
        }));
    }

    print_heading("Catalog Statistics");
    log::info!("  Database: {}", ctx.database_path().display());
    crate::log_blank();
    for (kind, count) in &stats.items {
        log::info!("  {:<15} {:>8}", format!("{}:", kind.as_str()), count);
    }
    log::info!("  {:<15} {:>8}", "total:", stats.total_items());
    crate::log_blank();
    log::info!("  Properties:     {:>8}", stats.properties);
    log::info!("  Unmapped:       {:>8}", stats.raw_properties);
    log::info!(
        "  Stat codes:     {:>8} ({} new)",
        stats.stat_codes,
        seeded.if_supports_color(Stdout, |t| t.green()),
    );
    log::info!("  With images:    {:>8}", stats.with_images);
    log::info!("  Import runs:    {:>8}", stats.import_runs);

    if !logs.is_empty() {
        crate::log_blank();
        print_heading("Recent Imports");
        for entry in &logs {
            log::info!(
                "  #{:<4} {}  {} new, {} renamed, {} unchanged, {} issues",
                entry.id,
                entry.imported_at.if_supports_color(Stdout, |t| t.dimmed()),
                entry.records_created,
                entry.records_updated,
                entry.records_unchanged,
                entry.errors,
            );
        }
    }

    Ok(())
}
