use std::path::{Path, PathBuf};

/// Errors that stop a whole source file from being read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Table parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSS selector '{0}'")]
    Selector(String),

    #[error("Unrecognized table file '{0}'")]
    UnknownTable(String),

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },
}

impl SourceError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn missing_column(file: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            file: file.into(),
            column: column.into(),
        }
    }
}

/// A single row that could not be read. Collected per file, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParseError {
    pub file: String,
    pub line: u64,
    pub message: String,
}

impl ParseError {
    pub fn new(file: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}
