//! Matching source items against catalog rows and writing the result.
//!
//! An exact match from a listing page syncs the display name when it
//! differs; no match inserts a new row. Properties are attached to new rows,
//! and to matched rows that have none yet.

use std::collections::HashMap;

use horadric_catalog::{ItemKind, MatchKind, MatchPolicy, NameIndex, PropertyAssignment};
use horadric_db::{
    OperationError, insert_item, insert_properties, list_items, property_count, update_item_name,
};
use horadric_source::{SourceItem, SourceProperty};
use rusqlite::Connection;
use serde::Serialize;

use crate::property::PropertyResolver;

/// Where a batch of items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Game data tables. Exact matches only; stored names are left alone.
    Table,
    /// Community listing pages. Substring fallback, and an exact match
    /// syncs the stored display name to the page's spelling.
    Page,
}

impl ItemOrigin {
    pub fn policy(self) -> MatchPolicy {
        match self {
            Self::Table => MatchPolicy::ExactOnly,
            Self::Page => MatchPolicy::ExactOrSubstring,
        }
    }

    pub fn syncs_names(self) -> bool {
        self == Self::Page
    }
}

/// What importing one item did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Inserted,
    /// Matched exactly on a page; the stored display name was replaced.
    Renamed,
    Unchanged,
}

/// Result of importing one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportedItem {
    pub id: i64,
    pub action: ItemAction,
    /// Property rows written.
    pub properties: usize,
}

/// Per-kind counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct KindStats {
    pub imported: usize,
    pub renamed: usize,
    pub unchanged: usize,
    /// Rows left out by the source (e.g. incomplete runewords) or failed.
    pub skipped: usize,
    pub properties: usize,
}

impl KindStats {
    pub fn record(&mut self, item: &ImportedItem) {
        match item.action {
            ItemAction::Inserted => self.imported += 1,
            ItemAction::Renamed => self.renamed += 1,
            ItemAction::Unchanged => self.unchanged += 1,
        }
        self.properties += item.properties;
    }
}

/// Imports items, keeping one name index per kind for the whole run.
///
/// Indexes are built from the catalog the first time a kind is seen and
/// updated as rows are inserted or renamed.
#[derive(Debug, Default)]
pub struct ItemImporter {
    indexes: HashMap<ItemKind, NameIndex<i64>>,
}

impl ItemImporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(
        &mut self,
        conn: &Connection,
        kind: ItemKind,
    ) -> Result<&mut NameIndex<i64>, OperationError> {
        if !self.indexes.contains_key(&kind) {
            let rows = list_items(conn, kind)?;
            let index: NameIndex<i64> = rows.iter().map(|r| (r.name.as_str(), r.id)).collect();
            log::debug!("Indexed {} existing {kind} rows", index.len());
            self.indexes.insert(kind, index);
        }
        Ok(self.indexes.entry(kind).or_default())
    }

    /// Import one item.
    ///
    /// All writes for the item happen under one savepoint: on failure the
    /// row, its rename, and its properties are all rolled back, and the
    /// name index is left as it was.
    pub fn import(
        &mut self,
        conn: &Connection,
        item: &SourceItem,
        origin: ItemOrigin,
        resolver: &mut PropertyResolver<'_>,
    ) -> Result<ImportedItem, OperationError> {
        let index = self.index(conn, item.kind)?;

        let matched = index.find(&item.name, origin.policy()).map(|m| {
            let rename = origin.syncs_names() && m.kind == MatchKind::Exact && m.name != item.name;
            (*m.value, rename)
        });

        conn.execute_batch("SAVEPOINT import_row")?;
        let written = write_item(conn, item, matched, resolver);
        match &written {
            Ok(_) => conn.execute_batch("RELEASE import_row")?,
            Err(_) => conn.execute_batch("ROLLBACK TO import_row; RELEASE import_row")?,
        }
        let imported = written?;

        match imported.action {
            ItemAction::Inserted => {
                index.insert(&item.name, imported.id);
            }
            ItemAction::Renamed => {
                index.rename(&item.name);
                log::debug!("Renamed {} #{} to '{}'", item.kind, imported.id, item.name);
            }
            ItemAction::Unchanged => {}
        }
        Ok(imported)
    }
}

/// Write one matched or new item and its properties.
fn write_item(
    conn: &Connection,
    item: &SourceItem,
    matched: Option<(i64, bool)>,
    resolver: &mut PropertyResolver<'_>,
) -> Result<ImportedItem, OperationError> {
    let (id, action) = match matched {
        Some((id, true)) => {
            update_item_name(conn, item.kind, id, &item.name)?;
            (id, ItemAction::Renamed)
        }
        Some((id, false)) => (id, ItemAction::Unchanged),
        None => (insert_item(conn, &item.to_catalog_item())?, ItemAction::Inserted),
    };

    let properties = if item.properties.is_empty()
        || (action != ItemAction::Inserted && property_count(conn, item.kind, id)? > 0)
    {
        0
    } else {
        let assignments = resolve_properties(&item.properties, resolver);
        insert_properties(conn, item.kind, id, &assignments)?
    };

    Ok(ImportedItem {
        id,
        action,
        properties,
    })
}

/// Resolve every source property, in order.
pub fn resolve_properties(
    properties: &[SourceProperty],
    resolver: &mut PropertyResolver<'_>,
) -> Vec<PropertyAssignment> {
    properties
        .iter()
        .map(|p| match p {
            SourceProperty::Coded {
                code,
                param,
                min,
                max,
            } => resolver.resolve_code(code, param.as_deref(), *min, *max),
            SourceProperty::Text(text) => resolver.resolve_text(text, None),
        })
        .collect()
}
