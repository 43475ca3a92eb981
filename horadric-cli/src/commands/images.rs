use horadric_import::{
    Deadline, ImagePipeline, ImageSources, ImportIssue, ImportOptions, load_image_map, run_images,
};
use horadric_media::{BlobStore, ReadOnlyBlobStore};

use crate::CliError;
use crate::cli_types::{ImageSourceArgs, RunArgs};

use super::{Context, print_dry_run_notice, print_heading, print_image_stats, print_issues, print_json};

/// Attach images named in the image manifest to catalog rows.
pub(crate) fn run_images_command(
    ctx: &Context,
    sources: ImageSourceArgs,
    force: bool,
    run: RunArgs,
) -> Result<(), CliError> {
    let settings = &ctx.settings.sources;
    let options = ImportOptions {
        image_dir: sources.image_dir.or_else(|| settings.image_dir.clone()),
        image_map: sources.image_map.or_else(|| settings.image_map.clone()),
        ..Default::default()
    };
    let Some(map) = load_image_map(&options)? else {
        log::warn!("No image manifest found; pass --image-dir or --image-map");
        return Ok(());
    };

    let conn = ctx.open_catalog()?;
    let blobs = ctx.blob_store()?;
    let read_only = ReadOnlyBlobStore::new(&blobs);
    let store: &dyn BlobStore = if run.dry_run { &read_only } else { &blobs };
    let fetcher = ctx.fetcher()?;
    let progress = ctx.progress();

    let pipeline = ImagePipeline::new(store, &fetcher)
        .force(force)
        .dry_run(run.dry_run);
    let image_sources = ImageSources {
        image_map: Some(&map),
        ..Default::default()
    };
    let phase = run_images(&conn, &pipeline, &image_sources, &Deadline::none(), &progress)?;
    let mut errors: Vec<ImportIssue> = map.errors.iter().map(ImportIssue::from).collect();
    errors.extend(phase.errors);

    if run.json {
        return print_json(&serde_json::json!({
            "dry_run": run.dry_run,
            "stats": phase.stats,
            "missing": phase.missing,
            "errors": errors,
        }));
    }

    print_heading("Images");
    print_image_stats(&phase.stats);
    for name in &phase.missing {
        log::debug!("    no image: {name}");
    }
    print_issues(&errors);
    print_dry_run_notice(run.dry_run);
    Ok(())
}
