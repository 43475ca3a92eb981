//! Application settings (database and blob locations, source paths).
//!
//! The settings file is `~/.config/horadric/settings.toml`. Every field is
//! optional; command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use horadric_media::CompositeConfig;
use horadric_source::HtmlSelectors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "horadric";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Where blobs live and how they are addressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobSettings {
    pub root: Option<PathBuf>,
    /// Prefix of public blob URLs. Defaults to a `file://` URL of the root.
    pub base_url: Option<String>,
}

/// Default locations of import sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub tables_dir: Option<PathBuf>,
    pub html_files: Vec<PathBuf>,
    /// Kind of items on HTML pages without a `data-kind`.
    pub html_kind: Option<String>,
    pub classes_dir: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    /// Image manifest. Defaults to `images.tsv` in the image directory.
    pub image_map: Option<PathBuf>,
    /// Base URL HTML image paths are relative to.
    pub image_base_url: Option<String>,
}

/// The whole settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: Option<PathBuf>,
    pub blobs: BlobSettings,
    pub sources: SourceSettings,
    pub html: HtmlSelectors,
    pub composite: CompositeConfig,
    pub fetch_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            blobs: BlobSettings::default(),
            sources: SourceSettings::default(),
            html: HtmlSelectors::default(),
            composite: CompositeConfig::default(),
            fetch_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, SettingsError> {
        toml::from_str(contents).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load a settings file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(path, &contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Resolve the database path: CLI override, then settings, then
    /// [`default_database_path`].
    pub fn database_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.database.clone())
            .unwrap_or_else(default_database_path)
    }

    /// Resolve the blob store root: CLI override, then settings, then
    /// `blobs/` beside the default database.
    pub fn blob_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.blobs.root.clone())
            .unwrap_or_else(|| data_dir().join("blobs"))
    }

    /// Public URL prefix for a blob root.
    pub fn blob_base_url(&self, root: &Path) -> String {
        self.blobs
            .base_url
            .clone()
            .unwrap_or_else(|| format!("file://{}", root.display()))
    }
}

/// Canonical path to the settings file: `~/.config/horadric/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join(APP_DIR).join("settings.toml")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `~/.local/share/horadric/catalog.db` (or the platform equivalent).
pub fn default_database_path() -> PathBuf {
    data_dir().join("catalog.db")
}

/// Load the settings file from its canonical path.
pub fn load_settings() -> Result<Settings, SettingsError> {
    Settings::load_from(&settings_path())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
