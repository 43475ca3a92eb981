//! Tab-delimited game data tables.
//!
//! Every table has a header row. Rows whose first column is empty, and the
//! `Expansion` separator rows, carry no item and are dropped while reading.
//! Rows the reader cannot decode are recorded as [`ParseError`]s and skipped.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ParseError, SourceError};

/// A parsed table, addressable by column name.
#[derive(Debug, Clone)]
pub struct Table {
    /// File name the table was read from (without path).
    pub file_name: String,
    headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<(u64, csv::StringRecord)>,
    /// Rows that could not be decoded.
    pub errors: Vec<ParseError>,
}

/// A borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    line: u64,
    record: &'a csv::StringRecord,
}

impl Table {
    /// Read a table from disk.
    pub fn open(path: &Path) -> Result<Table, SourceError> {
        let content = std::fs::read(path).map_err(|e| SourceError::io(path, e))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        Self::parse(&file_name, content.as_slice())
    }

    /// Parse table content from a string.
    pub fn parse_str(file_name: &str, content: &str) -> Result<Table, SourceError> {
        Self::parse(file_name, content.as_bytes())
    }

    fn parse(file_name: &str, content: &[u8]) -> Result<Table, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(content);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut columns = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            // First occurrence wins for repeated column names.
            columns.entry(h.to_lowercase()).or_insert(i);
        }

        let mut rows = Vec::new();
        let mut errors = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    log::warn!("Skipping malformed row in {file_name}: {e}");
                    errors.push(ParseError::new(file_name, line, e.to_string()));
                    continue;
                }
            };

            let first = record.get(0).unwrap_or("").trim();
            if first.is_empty() || first.eq_ignore_ascii_case("expansion") {
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            rows.push((line, record));
        }

        Ok(Table {
            file_name: file_name.to_string(),
            headers,
            columns,
            rows,
            errors,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Whether the table has a column (case-insensitive).
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(&name.to_lowercase())
    }

    /// Fail unless every named column is present.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), SourceError> {
        for name in names {
            if !self.has_column(name) {
                return Err(SourceError::missing_column(&self.file_name, *name));
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(move |(line, record)| TableRow {
            table: self,
            line: *line,
            record,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> TableRow<'a> {
    /// 1-based line number in the source file.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Trimmed value of a column; `None` when the column is absent or blank.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = *self.table.columns.get(&column.to_lowercase())?;
        let value = self.record.get(idx)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }

    /// Owned copy of [`get`](Self::get).
    pub fn string(&self, column: &str) -> Option<String> {
        self.get(column).map(String::from)
    }

    /// Integer value of a column. Blank is `Ok(None)`; anything else that
    /// isn't an integer is a [`ParseError`].
    pub fn int(&self, column: &str) -> Result<Option<i32>, ParseError> {
        match self.get(column) {
            None => Ok(None),
            Some(v) => v.parse::<i32>().map(Some).map_err(|_| {
                ParseError::new(
                    &self.table.file_name,
                    self.line,
                    format!("column '{column}': '{v}' is not an integer"),
                )
            }),
        }
    }

    /// The row's first column, which every kept row has.
    pub fn first(&self) -> &'a str {
        self.record.get(0).unwrap_or("").trim()
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(&self.table.file_name, self.line, message)
    }
}

#[cfg(test)]
#[path = "tests/tabular_tests.rs"]
mod tests;
