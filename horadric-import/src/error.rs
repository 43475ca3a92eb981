use horadric_catalog::YamlError;
use horadric_db::{OperationError, SchemaError};
use horadric_media::MediaError;
use horadric_source::SourceError;
use rusqlite::Connection;
use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that abort an import phase.
///
/// Per-item problems never surface here; they are collected in the report.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stat registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Class data error: {0}")]
    Classes(#[from] YamlError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
}

/// Run `f` in its own transaction, unless one is already open (a dry run
/// wraps everything in an outer transaction), in which case `f` joins it.
pub(crate) fn with_transaction<T, E>(
    conn: &Connection,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E>
where
    E: From<rusqlite::Error>,
{
    if !conn.is_autocommit() {
        return f();
    }

    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f() {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
