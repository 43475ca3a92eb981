//! Per-file mappers from game data tables to [`SourceItem`]s.

use std::path::{Path, PathBuf};

use horadric_catalog::ItemKind;

use crate::error::{ParseError, SourceError};
use crate::item::{SourceItem, SourceProperty};
use crate::tabular::{Table, TableRow};

/// Property column groups on unique and set items.
const ITEM_PROPERTY_SLOTS: usize = 12;
/// Property column groups on runewords.
const RUNEWORD_PROPERTY_SLOTS: usize = 7;
const RUNEWORD_MAX_RUNES: usize = 6;
const RUNEWORD_MAX_ITYPES: usize = 6;

/// The game data tables the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Weapons,
    Armor,
    Misc,
    UniqueItems,
    SetItems,
    Runes,
}

impl TableKind {
    /// Every table, in the order bases are read before the items built on them.
    pub const ALL: [TableKind; 6] = [
        Self::Weapons,
        Self::Armor,
        Self::Misc,
        Self::UniqueItems,
        Self::SetItems,
        Self::Runes,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Weapons => "Weapons.txt",
            Self::Armor => "Armor.txt",
            Self::Misc => "Misc.txt",
            Self::UniqueItems => "UniqueItems.txt",
            Self::SetItems => "SetItems.txt",
            Self::Runes => "Runes.txt",
        }
    }

    /// Identify a table from its file name, ignoring case.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.file_name().eq_ignore_ascii_case(name))
    }

    fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Weapons | Self::Armor | Self::Misc => &["name", "code", "type"],
            Self::UniqueItems => &["index", "code"],
            Self::SetItems => &["index", "set", "item"],
            Self::Runes => &["Name", "*Rune Name"],
        }
    }
}

/// Items mapped from one table, with the rows that failed.
#[derive(Debug, Clone)]
pub struct MappedTable {
    pub kind: TableKind,
    pub file_name: String,
    pub items: Vec<SourceItem>,
    pub errors: Vec<ParseError>,
    /// Rows deliberately not imported (e.g. incomplete runewords).
    pub skipped: usize,
}

/// Map every row of `table` to an item.
pub fn map_table(kind: TableKind, table: &Table) -> Result<MappedTable, SourceError> {
    table.require_columns(kind.required_columns())?;

    let mut mapped = MappedTable {
        kind,
        file_name: table.file_name.clone(),
        items: Vec::new(),
        errors: table.errors.clone(),
        skipped: 0,
    };

    for row in table.rows() {
        let result = match kind {
            TableKind::Weapons | TableKind::Armor => map_base(&row, &table.file_name),
            TableKind::Misc => map_misc(&row, &table.file_name),
            TableKind::UniqueItems => map_unique(&row, &table.file_name),
            TableKind::SetItems => map_set(&row, &table.file_name),
            TableKind::Runes => map_runeword(&row, &table.file_name),
        };
        match result {
            Ok(Some(item)) => mapped.items.push(item),
            Ok(None) => mapped.skipped += 1,
            Err(e) => {
                log::warn!("{e}");
                mapped.errors.push(e);
            }
        }
    }

    Ok(mapped)
}

/// Read and map a single table file. The table kind comes from the file name.
pub fn read_table_file(path: &Path) -> Result<MappedTable, SourceError> {
    let table = Table::open(path)?;
    let kind = TableKind::from_file_name(&table.file_name)
        .ok_or_else(|| SourceError::UnknownTable(table.file_name.clone()))?;
    map_table(kind, &table)
}

/// A table file that could not be opened or mapped as a whole.
#[derive(Debug)]
pub struct TableFailure {
    pub file_name: String,
    pub error: SourceError,
}

/// Read every known table present in `dir`, in [`TableKind::ALL`] order.
/// Absent tables are skipped. Each file succeeds or fails on its own; only
/// an unreadable directory is an error for the whole call.
pub fn read_tables_dir(dir: &Path) -> Result<Vec<Result<MappedTable, TableFailure>>, SourceError> {
    let entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| SourceError::io(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();

    let mut tables = Vec::new();
    for kind in TableKind::ALL {
        let found = entries.iter().find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(kind.file_name()))
        });
        let Some(path) = found else {
            log::debug!("No {} in {}", kind.file_name(), dir.display());
            continue;
        };
        let mapped = Table::open(path).and_then(|table| map_table(kind, &table));
        tables.push(mapped.map_err(|error| {
            log::warn!("Skipping {}: {error}", path.display());
            TableFailure {
                file_name: kind.file_name().to_string(),
                error,
            }
        }));
    }
    Ok(tables)
}

// ── Row Mappers ─────────────────────────────────────────────────────────────

fn map_base(row: &TableRow, file: &str) -> Result<Option<SourceItem>, ParseError> {
    let Some(name) = row.get("name") else {
        return Ok(None);
    };
    let mut item = SourceItem::new(ItemKind::Base, name, file);
    item.code = row.string("code");
    item.level_req = row.int("levelreq")?;
    Ok(Some(item))
}

fn map_misc(row: &TableRow, file: &str) -> Result<Option<SourceItem>, ParseError> {
    let Some(mut item) = map_base(row, file)? else {
        return Ok(None);
    };
    item.kind = misc_kind(row.get("type").unwrap_or(""));
    Ok(Some(item))
}

/// Which catalog table a `Misc.txt` row belongs in, by its item type.
pub fn misc_kind(item_type: &str) -> ItemKind {
    let t = item_type.trim().to_lowercase();
    if t == "rune" {
        ItemKind::Rune
    } else if t.starts_with("gem") {
        ItemKind::Gem
    } else if t == "ques" {
        ItemKind::Quest
    } else {
        ItemKind::Base
    }
}

fn map_unique(row: &TableRow, file: &str) -> Result<Option<SourceItem>, ParseError> {
    let mut item = SourceItem::new(ItemKind::Unique, row.first(), file);
    item.base_code = row.string("code");
    item.level_req = row.int("lvl req")?;
    item.properties = coded_properties(row, ITEM_PROPERTY_SLOTS, |n| {
        [
            format!("prop{n}"),
            format!("par{n}"),
            format!("min{n}"),
            format!("max{n}"),
        ]
    })?;
    Ok(Some(item))
}

fn map_set(row: &TableRow, file: &str) -> Result<Option<SourceItem>, ParseError> {
    let Some(mut item) = map_unique(row, file)? else {
        return Ok(None);
    };
    item.kind = ItemKind::Set;
    item.set_name = row.string("set");
    item.base_code = row.string("item");
    Ok(Some(item))
}

fn map_runeword(row: &TableRow, file: &str) -> Result<Option<SourceItem>, ParseError> {
    // Disabled runewords stay in the table but can't be made.
    if row.get("complete").is_some_and(|c| c != "1") {
        return Ok(None);
    }
    let name = row.get("*Rune Name").unwrap_or(row.first());
    let mut item = SourceItem::new(ItemKind::Runeword, name, file);
    item.code = Some(row.first().to_string());
    item.runes = (1..=RUNEWORD_MAX_RUNES)
        .filter_map(|n| row.string(&format!("Rune{n}")))
        .collect();
    item.base_types = (1..=RUNEWORD_MAX_ITYPES)
        .filter_map(|n| row.string(&format!("itype{n}")))
        .collect();
    if item.runes.is_empty() {
        return Err(row.error(format!("runeword '{name}' lists no runes")));
    }
    item.properties = coded_properties(row, RUNEWORD_PROPERTY_SLOTS, |n| {
        [
            format!("T1Code{n}"),
            format!("T1Param{n}"),
            format!("T1Min{n}"),
            format!("T1Max{n}"),
        ]
    })?;
    Ok(Some(item))
}

/// Collect `(code, param, min, max)` column groups 1..=slots. A group
/// without a code is empty.
fn coded_properties(
    row: &TableRow,
    slots: usize,
    columns: impl Fn(usize) -> [String; 4],
) -> Result<Vec<SourceProperty>, ParseError> {
    let mut props = Vec::new();
    for n in 1..=slots {
        let [code_col, param_col, min_col, max_col] = columns(n);
        let Some(code) = row.string(&code_col) else {
            continue;
        };
        props.push(SourceProperty::Coded {
            code,
            param: row.string(&param_col),
            min: row.int(&min_col)?,
            max: row.int(&max_col)?,
        });
    }
    Ok(props)
}

#[cfg(test)]
#[path = "tests/tables_tests.rs"]
mod tests;
