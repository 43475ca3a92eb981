use std::time::Duration;

use horadric_catalog::ItemKind;
use horadric_import::{ImportOptions, ImportReport};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::cli_types::ImportArgs;

use super::{
    Context, print_composite_stats, print_dry_run_notice, print_duplicates, print_heading,
    print_image_stats, print_issues, print_json,
};

/// Merge command-line arguments over the settings file.
pub(crate) fn import_options(ctx: &Context, args: ImportArgs) -> Result<ImportOptions, CliError> {
    let sources = &ctx.settings.sources;

    let html_kind = match args.html_kind.or_else(|| sources.html_kind.clone()) {
        Some(name) => ItemKind::from_str_loose(&name)
            .ok_or_else(|| CliError::invalid_argument(format!("unknown item kind '{name}'")))?,
        None => ItemKind::Unique,
    };
    let html_files = if args.html_files.is_empty() {
        sources.html_files.clone()
    } else {
        args.html_files
    };

    Ok(ImportOptions {
        tables_dir: args.tables.or_else(|| sources.tables_dir.clone()),
        html_files,
        html_kind,
        selectors: ctx.settings.html.clone(),
        classes_dir: args.classes.or_else(|| sources.classes_dir.clone()),
        image_dir: args.images.image_dir.or_else(|| sources.image_dir.clone()),
        image_map: args.images.image_map.or_else(|| sources.image_map.clone()),
        image_base_url: args
            .image_base_url
            .or_else(|| sources.image_base_url.clone()),
        composite: ctx.settings.composite,
        dry_run: args.run.dry_run,
        force_images: args.force_images,
        regenerate_composites: args.regenerate_composites,
        timeout: args.timeout.map(Duration::from_secs),
    })
}

/// Run a full import and print its report.
pub(crate) fn run_import(ctx: &Context, args: ImportArgs) -> Result<(), CliError> {
    let json = args.run.json;
    let options = import_options(ctx, args)?;

    if options.tables_dir.is_none() && options.html_files.is_empty() {
        log::warn!("No tables directory or HTML pages given; only the registry and cleanup will run");
    }

    let conn = ctx.open_catalog()?;
    let blobs = ctx.blob_store()?;
    let fetcher = ctx.fetcher()?;
    let progress = ctx.progress();

    log::info!("Catalog: {}", ctx.database_path().display());
    let report = horadric_import::run_import(&conn, &blobs, &fetcher, &options, &progress)?;

    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    crate::log_blank();
    print_heading("Items");
    for (kind, stats) in &report.items {
        log::info!(
            "  {:<10} {:>6} new  {:>6} renamed  {:>6} unchanged  {:>6} skipped  {:>6} properties",
            kind.as_str(),
            stats.imported.if_supports_color(Stdout, |t| t.green()),
            stats.renamed,
            stats.unchanged,
            stats.skipped,
            stats.properties,
        );
    }
    log::info!("  Stats seeded:   {:>8}", report.stats_seeded);
    if !report.missing_stat_codes.is_empty() {
        log::info!(
            "  Unmapped properties: {} (use -v to list)",
            report.missing_stat_codes.len(),
        );
        for text in &report.missing_stat_codes {
            log::debug!("    {text}");
        }
    }

    crate::log_blank();
    print_heading("Images");
    print_image_stats(&report.images);
    for name in &report.missing_images {
        log::debug!("    no image: {name}");
    }

    crate::log_blank();
    print_heading("Runeword composites");
    print_composite_stats(&report.composites);

    crate::log_blank();
    print_heading("Duplicates");
    log::info!("  Cross-domain:   {:>8}", report.dedupe.cross_domain_found);
    log::info!("  Same-table:     {:>8}", report.dedupe.same_table_found);
    log::info!("  Deleted:        {:>8}", report.dedupe.deleted);
    print_duplicates(&report.duplicates);

    print_issues(&report.errors);

    if report.timed_out {
        log::warn!("Import stopped at the deadline; run again to finish");
    }
    if let Some(id) = report.log_id {
        log::debug!("Import log entry #{id}");
    }
    print_dry_run_notice(report.dry_run);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use horadric_import::Settings;

    use super::*;
    use crate::cli_types::{ImageSourceArgs, RunArgs};

    fn ctx(settings: Settings) -> Context {
        Context {
            settings,
            db: None,
            blob_root: None,
            quiet: true,
        }
    }

    fn args() -> ImportArgs {
        ImportArgs {
            tables: None,
            html_files: Vec::new(),
            html_kind: None,
            classes: None,
            images: ImageSourceArgs::default(),
            image_base_url: None,
            force_images: false,
            regenerate_composites: false,
            timeout: None,
            run: RunArgs::default(),
        }
    }

    #[test]
    fn flags_override_settings() {
        let mut settings = Settings::default();
        settings.sources.tables_dir = Some(PathBuf::from("/settings/tables"));
        settings.sources.html_files = vec![PathBuf::from("/settings/page.html")];
        settings.sources.html_kind = Some("set".to_string());

        let options = import_options(
            &ctx(settings),
            ImportArgs {
                tables: Some(PathBuf::from("/cli/tables")),
                timeout: Some(90),
                ..args()
            },
        )
        .unwrap();
        assert_eq!(options.tables_dir, Some(PathBuf::from("/cli/tables")));
        assert_eq!(options.html_files, vec![PathBuf::from("/settings/page.html")]);
        assert_eq!(options.html_kind, ItemKind::Set);
        assert_eq!(options.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn html_kind_defaults_to_unique() {
        let options = import_options(&ctx(Settings::default()), args()).unwrap();
        assert_eq!(options.html_kind, ItemKind::Unique);
    }

    #[test]
    fn unknown_html_kind_is_rejected() {
        let result = import_options(
            &ctx(Settings::default()),
            ImportArgs {
                html_kind: Some("trinket".to_string()),
                ..args()
            },
        );
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }
}
