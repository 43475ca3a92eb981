//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "horadric")]
#[command(about = "Build and maintain the Diablo II item catalog", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database file (default: from settings, else the data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Blob store directory (default: from settings, else beside the database)
    #[arg(long, global = true)]
    pub blob_root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that changes the catalog.
#[derive(Args, Clone, Copy, Default)]
pub(crate) struct RunArgs {
    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone, Default)]
pub(crate) struct ImageSourceArgs {
    /// Directory holding local item images
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Image manifest (default: images.tsv in the image directory)
    #[arg(long)]
    pub image_map: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub(crate) struct ImportArgs {
    /// Directory with the game's tab-delimited tables (Weapons.txt, UniqueItems.txt, ...)
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// Scraped HTML listing pages
    #[arg(long = "html", value_name = "FILE")]
    pub html_files: Vec<PathBuf>,

    /// Item kind for HTML items without a data-kind attribute
    #[arg(long)]
    pub html_kind: Option<String>,

    /// Directory of class skill-tree YAML files
    #[arg(long)]
    pub classes: Option<PathBuf>,

    #[command(flatten)]
    pub images: ImageSourceArgs,

    /// Base URL that HTML image paths are relative to
    #[arg(long)]
    pub image_base_url: Option<String>,

    /// Re-upload images for items that already have one
    #[arg(long)]
    pub force_images: bool,

    /// Rebuild composites for runewords that already have an image
    #[arg(long)]
    pub regenerate_composites: bool,

    /// Stop starting new items after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import game tables and scraped pages into the catalog
    Import(ImportArgs),

    /// Remove duplicate catalog rows
    Dedupe {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Attach images from the image manifest to catalog items
    Images {
        #[command(flatten)]
        sources: ImageSourceArgs,

        /// Replace images items already have
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Render runeword icons from their runes
    Composites {
        /// Rebuild composites for runewords that already have an image
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Seed the stat registry and show catalog counts
    Stats {
        /// Directory of class skill-tree YAML files to seed skills from
        #[arg(long)]
        classes: Option<PathBuf>,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a property line resolves against the stat registry
    Resolve {
        /// Property text, e.g. "+150 To Attack Rating"
        text: String,

        /// Stat code or alias to try first
        #[arg(long)]
        hint: Option<String>,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the settings file path
    Path,

    /// Show the effective settings
    Show,
}
