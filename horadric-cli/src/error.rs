use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database could not be opened or queried
    #[error("Database error: {0}")]
    Database(String),

    /// Blob store could not be initialized
    #[error("Blob store error: {0}")]
    Blobs(String),

    /// Settings file could not be read
    #[error("Config error: {0}")]
    Config(#[from] horadric_import::SettingsError),

    /// Import setup failed
    #[error("Import failed: {0}")]
    Import(#[from] horadric_import::ImportError),

    /// Stat registry could not be loaded or seeded
    #[error("Registry error: {0}")]
    Registry(#[from] horadric_import::RegistryError),

    /// Class YAML could not be read
    #[error("Class data error: {0}")]
    Classes(#[from] horadric_catalog::YamlError),

    /// Bad command-line value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Report could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn blobs(msg: impl Into<String>) -> Self {
        Self::Blobs(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
