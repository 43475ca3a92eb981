//! horadric CLI
//!
//! Command-line interface for building the Diablo II item catalog from game
//! tables, scraped pages, and image sources.

mod cli_types;
mod commands;
mod error;
mod logging;
mod progress;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::Context;
pub(crate) use error::CliError;

/// Print an empty line through the logger so it respects `--quiet`.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.quiet, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config commands must work even when the settings file is broken.
    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Show => commands::config::run_config_show(cli.db, cli.blob_root),
        };
    }

    let ctx = Context {
        settings: horadric_import::load_settings()?,
        db: cli.db,
        blob_root: cli.blob_root,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Import(args) => commands::import::run_import(&ctx, args),
        Commands::Dedupe { run } => commands::dedupe::run_dedupe(&ctx, run),
        Commands::Images {
            sources,
            force,
            run,
        } => commands::images::run_images_command(&ctx, sources, force, run),
        Commands::Composites { force, run } => {
            commands::composites::run_composites_command(&ctx, force, run)
        }
        Commands::Stats { classes, json } => commands::stats::run_stats(&ctx, classes, json),
        Commands::Resolve { text, hint } => {
            commands::resolve::run_resolve(&ctx, &text, hint.as_deref())
        }
        Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "horadric", "dedupe", "--dry-run", "--db", "/tmp/c.db", "--quiet",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/c.db")));
        assert!(matches!(cli.command, Commands::Dedupe { run } if run.dry_run && !run.json));
    }

    #[test]
    fn import_accepts_repeated_html_pages() {
        let cli = Cli::try_parse_from([
            "horadric",
            "import",
            "--tables",
            "data/global/excel",
            "--html",
            "uniques.html",
            "--html",
            "sets.html",
            "--timeout",
            "120",
            "--json",
        ])
        .unwrap();
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.html_files.len(), 2);
        assert_eq!(args.timeout, Some(120));
        assert!(args.run.json);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["horadric", "-v", "--quiet", "stats"]).is_err());
    }
}
