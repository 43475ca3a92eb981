//! Read queries for the catalog database.
//!
//! Provides item listing and lookup, property and stat code reads, duplicate
//! detection, and summary statistics.

use std::collections::BTreeMap;

use horadric_catalog::{
    CatalogItem, ImportLog, ItemIdentity, ItemKind, ItemProperty, PropertyAssignment,
    StatCategory, StatCode, normalize,
};
use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::operations::OperationError;
use crate::schema::table_name;

const ITEM_COLUMNS: &str = "id, code, name, base_code, set_name, level_req, runes, base_types,
     image_url, image_key, source, created_at, updated_at";

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn row_to_item(kind: ItemKind, row: &Row) -> rusqlite::Result<CatalogItem> {
    Ok(CatalogItem {
        id: row.get(0)?,
        kind,
        code: row.get(1)?,
        name: row.get(2)?,
        base_code: row.get(3)?,
        set_name: row.get(4)?,
        level_req: row.get(5)?,
        runes: split_list(row.get(6)?),
        base_types: split_list(row.get(7)?),
        image_url: row.get(8)?,
        image_key: row.get(9)?,
        source: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

// ── Item Lookups ────────────────────────────────────────────────────────────

/// List every row of a kind, in ID order.
pub fn list_items(conn: &Connection, kind: ItemKind) -> Result<Vec<CatalogItem>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM {} ORDER BY id",
        table_name(kind)
    ))?;
    let rows = stmt.query_map([], |row| row_to_item(kind, row))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Fetch a single row by ID.
pub fn get_item(
    conn: &Connection,
    kind: ItemKind,
    id: i64,
) -> Result<Option<CatalogItem>, OperationError> {
    let result = conn.query_row(
        &format!(
            "SELECT {ITEM_COLUMNS} FROM {} WHERE id = ?1",
            table_name(kind)
        ),
        params![id],
        |row| row_to_item(kind, row),
    );
    match result {
        Ok(item) => Ok(Some(item)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Count rows of a kind.
pub fn count_items(conn: &Connection, kind: ItemKind) -> Result<i64, OperationError> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table_name(kind)),
        [],
        |r| r.get(0),
    )?;
    Ok(count)
}

// ── Properties ──────────────────────────────────────────────────────────────

/// Properties of a row, in position order.
pub fn properties_for_item(
    conn: &Connection,
    kind: ItemKind,
    item_id: i64,
) -> Result<Vec<ItemProperty>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, position, stat_code, param, min_value, max_value, raw_text
         FROM item_properties WHERE item_kind = ?1 AND item_id = ?2
         ORDER BY position",
    )?;
    let rows = stmt.query_map(params![kind.as_str(), item_id], |row| {
        Ok(ItemProperty {
            id: row.get(0)?,
            kind,
            item_id,
            position: row.get(1)?,
            assignment: PropertyAssignment {
                code: row.get(2)?,
                param: row.get(3)?,
                min: row.get(4)?,
                max: row.get(5)?,
                raw_text: row.get(6)?,
            },
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Number of properties attached to a row.
pub fn property_count(
    conn: &Connection,
    kind: ItemKind,
    item_id: i64,
) -> Result<i64, OperationError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM item_properties WHERE item_kind = ?1 AND item_id = ?2",
        params![kind.as_str(), item_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

// ── Stat Codes ──────────────────────────────────────────────────────────────

/// List all persisted stat codes, ordered by code.
pub fn list_stat_codes(conn: &Connection) -> Result<Vec<StatCode>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT code, name, description, category, aliases, is_variable
         FROM stat_codes ORDER BY code",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, bool>(5)?,
        ))
    })?;

    let mut stats = Vec::new();
    for row in rows {
        let (code, name, description, category, aliases, is_variable) = row?;
        stats.push(StatCode {
            code,
            name,
            description,
            category: StatCategory::from_str_loose(&category),
            aliases: serde_json::from_str(&aliases)?,
            is_variable,
        });
    }
    Ok(stats)
}

// ── Duplicate Detection ─────────────────────────────────────────────────────

/// Rows of one kind sharing a lower-cased name.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub kind: ItemKind,
    /// The shared lower-cased name.
    pub name: String,
    /// Row IDs in ascending order; the first is the keeper.
    pub ids: Vec<i64>,
}

/// Groups of rows whose names are equal ignoring case, ordered by name.
pub fn duplicate_name_groups(
    conn: &Connection,
    kind: ItemKind,
) -> Result<Vec<DuplicateGroup>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, LOWER(name) FROM {} ORDER BY id",
        table_name(kind)
    ))?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

    let mut by_name: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for row in rows {
        let (id, name) = row?;
        by_name.entry(name).or_default().push(id);
    }

    Ok(by_name
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(name, ids)| DuplicateGroup { kind, name, ids })
        .collect())
}

/// A base row that duplicates a rune or gem row.
#[derive(Debug, Clone, Serialize)]
pub struct CrossDomainDuplicate {
    pub base: ItemIdentity,
    /// The rune or gem row that is kept.
    pub authority: ItemIdentity,
}

/// Base rows whose lower-cased name or code equals a rune's or gem's.
///
/// Each base row is reported once, against the first matching rune (then
/// gem) row by ID.
pub fn cross_domain_duplicates(
    conn: &Connection,
) -> Result<Vec<CrossDomainDuplicate>, OperationError> {
    let mut found: BTreeMap<i64, CrossDomainDuplicate> = BTreeMap::new();

    for authority_kind in [ItemKind::Rune, ItemKind::Gem] {
        let mut stmt = conn.prepare(&format!(
            "SELECT b.id, b.code, b.name, d.id, d.code, d.name
             FROM base_items b
             JOIN {} d
               ON LOWER(b.name) = LOWER(d.name)
               OR (b.code IS NOT NULL AND b.code != '' AND b.code = d.code)
             ORDER BY b.id, d.id",
            table_name(authority_kind)
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        for row in rows {
            let (base_id, base_code, base_name, auth_id, auth_code, auth_name) = row?;
            found.entry(base_id).or_insert_with(|| CrossDomainDuplicate {
                base: ItemIdentity {
                    kind: ItemKind::Base,
                    id: base_id,
                    code: base_code,
                    key: normalize(&base_name),
                    name: base_name,
                },
                authority: ItemIdentity {
                    kind: authority_kind,
                    id: auth_id,
                    code: auth_code,
                    key: normalize(&auth_name),
                    name: auth_name,
                },
            });
        }
    }

    Ok(found.into_values().collect())
}

// ── Stats ───────────────────────────────────────────────────────────────────

/// Summary statistics for the catalog.
#[derive(Debug, Default, Serialize)]
pub struct CatalogStats {
    /// Row count per kind, in import order.
    pub items: Vec<(ItemKind, i64)>,
    pub properties: i64,
    pub raw_properties: i64,
    pub stat_codes: i64,
    pub with_images: i64,
    pub import_runs: i64,
}

impl CatalogStats {
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|(_, n)| n).sum()
    }
}

/// Gather summary statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let mut stats = CatalogStats::default();
    for kind in ItemKind::ALL {
        stats.items.push((kind, count_items(conn, kind)?));
        let with_images: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE image_url IS NOT NULL AND image_url != ''",
                table_name(kind)
            ),
            [],
            |r| r.get(0),
        )?;
        stats.with_images += with_images;
    }
    stats.properties = conn.query_row("SELECT COUNT(*) FROM item_properties", [], |r| r.get(0))?;
    stats.raw_properties = conn.query_row(
        "SELECT COUNT(*) FROM item_properties WHERE stat_code = 'raw'",
        [],
        |r| r.get(0),
    )?;
    stats.stat_codes = conn.query_row("SELECT COUNT(*) FROM stat_codes", [], |r| r.get(0))?;
    stats.import_runs = conn.query_row("SELECT COUNT(*) FROM import_log", [], |r| r.get(0))?;
    Ok(stats)
}

// ── Import Logs ─────────────────────────────────────────────────────────────

/// List recent import logs, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, source_type, source_name, imported_at,
                records_created, records_updated, records_unchanged, errors
         FROM import_log ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLog {
            id: row.get(0)?,
            source_type: row.get(1)?,
            source_name: row.get(2)?,
            imported_at: row.get(3)?,
            records_created: row.get(4)?,
            records_updated: row.get(5)?,
            records_unchanged: row.get(6)?,
            errors: row.get(7)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
