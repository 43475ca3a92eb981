use horadric_import::{DedupeOptions, dedupe_catalog};

use crate::CliError;
use crate::cli_types::RunArgs;

use super::{Context, print_dry_run_notice, print_duplicates, print_heading, print_issues, print_json};

/// Remove cross-domain and same-table duplicates.
pub(crate) fn run_dedupe(ctx: &Context, run: RunArgs) -> Result<(), CliError> {
    let conn = ctx.open_catalog()?;
    let result = dedupe_catalog(
        &conn,
        &DedupeOptions {
            dry_run: run.dry_run,
        },
    )?;

    if run.json {
        return print_json(&serde_json::json!({
            "dry_run": run.dry_run,
            "stats": result.stats,
            "details": result.details,
            "errors": result.errors,
        }));
    }

    print_heading("Duplicate Cleanup");
    log::info!("  Cross-domain:   {:>8}", result.stats.cross_domain_found);
    log::info!(
        "  Same-table:     {:>8} in {} group(s)",
        result.stats.same_table_found,
        result.stats.same_table_groups,
    );
    log::info!("  Deleted:        {:>8}", result.stats.deleted);
    if result.stats.failed > 0 {
        log::warn!("  Failed:         {:>8}", result.stats.failed);
    }
    print_duplicates(&result.details);
    print_issues(&result.errors);
    print_dry_run_notice(run.dry_run);
    Ok(())
}
