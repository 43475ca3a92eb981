use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use horadric_import::{Settings, load_settings_string, settings_path};

use crate::CliError;

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

/// Show the settings file and the locations it resolves to.
pub(crate) fn run_config_show(
    db: Option<std::path::PathBuf>,
    blob_root: Option<std::path::PathBuf>,
) -> Result<(), CliError> {
    let path = settings_path();
    log::info!(
        "{}",
        "Horadric Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let settings = Settings::load_from(&path)?;
    let root = settings.blob_root(blob_root);
    log::info!("  Database:      {}", settings.database_path(db).display());
    log::info!("  Blob root:     {}", root.display());
    log::info!("  Blob URLs:     {}", settings.blob_base_url(&root));
    log::info!("  Fetch timeout: {}s", settings.fetch_timeout_secs);

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {line}");
        }
    }
    Ok(())
}
