//! Write operations for catalog rows, properties, stat codes, and import logs.

use horadric_catalog::{CatalogItem, ImportLog, ItemKind, PropertyAssignment, StatCode};
use rusqlite::{Connection, params};
use thiserror::Error;

use crate::schema::table_name;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

impl OperationError {
    fn not_found(kind: ItemKind, id: i64) -> Self {
        Self::NotFound {
            entity_type: kind.to_string(),
            id: id.to_string(),
        }
    }
}

/// Join a list column for storage. Empty lists are stored as NULL.
pub(crate) fn join_list(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

// ── Item Operations ─────────────────────────────────────────────────────────

/// Insert a new row into the table for `item.kind`. Returns the generated ID.
pub fn insert_item(conn: &Connection, item: &CatalogItem) -> Result<i64, OperationError> {
    conn.execute(
        &format!(
            "INSERT INTO {} (code, name, base_code, set_name, level_req, runes, base_types,
                 image_url, image_key, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            table_name(item.kind)
        ),
        params![
            item.code,
            item.name,
            item.base_code,
            item.set_name,
            item.level_req,
            join_list(&item.runes),
            join_list(&item.base_types),
            item.image_url,
            item.image_key,
            item.source,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace a row's display name (name sync).
pub fn update_item_name(
    conn: &Connection,
    kind: ItemKind,
    id: i64,
    name: &str,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        &format!(
            "UPDATE {} SET name = ?2, updated_at = datetime('now') WHERE id = ?1",
            table_name(kind)
        ),
        params![id, name],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found(kind, id));
    }
    Ok(())
}

/// Attach an image URL and its blob key to a row.
pub fn update_item_image(
    conn: &Connection,
    kind: ItemKind,
    id: i64,
    url: &str,
    key: &str,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        &format!(
            "UPDATE {} SET image_url = ?2, image_key = ?3, updated_at = datetime('now')
             WHERE id = ?1",
            table_name(kind)
        ),
        params![id, url, key],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found(kind, id));
    }
    Ok(())
}

/// Delete a row together with its properties.
pub fn delete_item(conn: &Connection, kind: ItemKind, id: i64) -> Result<(), OperationError> {
    conn.execute(
        "DELETE FROM item_properties WHERE item_kind = ?1 AND item_id = ?2",
        params![kind.as_str(), id],
    )?;
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", table_name(kind)),
        params![id],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found(kind, id));
    }
    Ok(())
}

// ── Property Operations ─────────────────────────────────────────────────────

/// Append property assignments to a row, after any it already has.
/// Returns the number of rows written.
pub fn insert_properties(
    conn: &Connection,
    kind: ItemKind,
    item_id: i64,
    assignments: &[PropertyAssignment],
) -> Result<usize, OperationError> {
    let start: i32 = conn.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM item_properties
         WHERE item_kind = ?1 AND item_id = ?2",
        params![kind.as_str(), item_id],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO item_properties (item_kind, item_id, position, stat_code, param,
             min_value, max_value, raw_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (offset, a) in assignments.iter().enumerate() {
        stmt.execute(params![
            kind.as_str(),
            item_id,
            start + offset as i32,
            a.code,
            a.param,
            a.min,
            a.max,
            a.raw_text,
        ])?;
    }
    Ok(assignments.len())
}

// ── Stat Code Operations ────────────────────────────────────────────────────

/// Insert a stat code unless one with the same code exists.
/// Returns `true` if a row was written.
pub fn insert_stat_code(conn: &Connection, stat: &StatCode) -> Result<bool, OperationError> {
    let aliases = serde_json::to_string(&stat.aliases)?;
    let changed = conn.execute(
        "INSERT OR IGNORE INTO stat_codes (code, name, description, category, aliases, is_variable)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            stat.code,
            stat.name,
            stat.description,
            stat.category.as_str(),
            aliases,
            stat.is_variable,
        ],
    )?;
    Ok(changed > 0)
}

// ── Import Log ──────────────────────────────────────────────────────────────

/// Insert an import log entry. Returns the generated ID.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_type, source_name, imported_at,
             records_created, records_updated, records_unchanged, errors)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.source_type,
            log.source_name,
            log.imported_at,
            log.records_created,
            log.records_updated,
            log.records_unchanged,
            log.errors,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
