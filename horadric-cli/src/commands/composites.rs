use horadric_import::{Deadline, ImagePipeline, run_composites};
use horadric_media::{BlobStore, LocalFetcher, ReadOnlyBlobStore};

use crate::CliError;
use crate::cli_types::RunArgs;

use super::{Context, print_composite_stats, print_dry_run_notice, print_heading, print_issues, print_json};

/// Render composite icons for runewords from their rune icons.
pub(crate) fn run_composites_command(ctx: &Context, force: bool, run: RunArgs) -> Result<(), CliError> {
    let conn = ctx.open_catalog()?;
    let blobs = ctx.blob_store()?;
    let read_only = ReadOnlyBlobStore::new(&blobs);
    let store: &dyn BlobStore = if run.dry_run { &read_only } else { &blobs };
    let progress = ctx.progress();

    // Rune icons come from the blob store; nothing is fetched.
    let fetcher = LocalFetcher;
    let pipeline = ImagePipeline::new(store, &fetcher).dry_run(run.dry_run);
    let phase = run_composites(
        &conn,
        &pipeline,
        &ctx.settings.composite,
        force,
        &Deadline::none(),
        &progress,
    )?;

    if run.json {
        return print_json(&serde_json::json!({
            "dry_run": run.dry_run,
            "stats": phase.stats,
            "errors": phase.errors,
        }));
    }

    print_heading("Runeword Composites");
    print_composite_stats(&phase.stats);
    print_issues(&phase.errors);
    print_dry_run_notice(run.dry_run);
    Ok(())
}
