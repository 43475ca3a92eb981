//! Duplicate cleanup.
//!
//! Two passes, always in this order:
//!
//! 1. Cross-domain: a base row that shares its name or code with a rune or
//!    gem row is removed; the rune or gem row is authoritative.
//! 2. Same-table: within unique, set, and base items, rows whose names are
//!    equal ignoring case are collapsed onto the lowest ID.
//!
//! Deletions are individually best-effort. A failed deletion is logged and
//! recorded, and the rest of the batch continues.

use std::collections::HashSet;

use horadric_catalog::ItemKind;
use horadric_db::{OperationError, cross_domain_duplicates, delete_item, duplicate_name_groups};
use rusqlite::Connection;
use serde::Serialize;

use crate::error::{ImportError, with_transaction};
use crate::report::{ImportIssue, IssueKind};

/// Kinds the same-table pass runs over.
pub const SAME_TABLE_KINDS: [ItemKind; 3] = [ItemKind::Unique, ItemKind::Set, ItemKind::Base];

/// Options controlling the cleanup pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupeOptions {
    /// Report without deleting.
    pub dry_run: bool,
}

/// Statistics from a cleanup run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DedupeStats {
    pub cross_domain_found: usize,
    pub same_table_groups: usize,
    pub same_table_found: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Why a row is redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    /// A base row shadowing a rune or gem.
    CrossDomain,
    /// Same name as a lower-ID row of the same kind.
    SameTable,
}

impl DuplicateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrossDomain => "cross-domain",
            Self::SameTable => "same-table",
        }
    }
}

/// One kept row and the rows removed in its favor (used for CLI output).
#[derive(Debug, Clone, Serialize)]
pub struct DedupeDetail {
    pub reason: DuplicateReason,
    pub name: String,
    pub kept_kind: ItemKind,
    pub kept_id: i64,
    pub removed_kind: ItemKind,
    pub removed_ids: Vec<i64>,
}

/// Result of a cleanup run including stats and per-group details.
#[derive(Debug, Default)]
pub struct DedupeResult {
    pub stats: DedupeStats,
    pub details: Vec<DedupeDetail>,
    pub errors: Vec<ImportIssue>,
}

/// Remove duplicate rows across and within tables.
pub fn dedupe_catalog(
    conn: &Connection,
    options: &DedupeOptions,
) -> Result<DedupeResult, ImportError> {
    let mut result = DedupeResult::default();

    let cross = cross_domain_duplicates(conn)?;
    result.stats.cross_domain_found = cross.len();

    // Base rows the cross-domain pass removes, or would remove on a dry run.
    let mut removed: HashSet<(ItemKind, i64)> = HashSet::new();

    with_transaction(conn, || -> Result<(), ImportError> {
        for dup in &cross {
            result.details.push(DedupeDetail {
                reason: DuplicateReason::CrossDomain,
                name: dup.base.name.clone(),
                kept_kind: dup.authority.kind,
                kept_id: dup.authority.id,
                removed_kind: ItemKind::Base,
                removed_ids: vec![dup.base.id],
            });
            if options.dry_run || delete_row(conn, ItemKind::Base, dup.base.id, &mut result) {
                removed.insert((ItemKind::Base, dup.base.id));
            }
        }
        Ok(())
    })?;

    for kind in SAME_TABLE_KINDS {
        let groups = duplicate_name_groups(conn, kind)?;
        with_transaction(conn, || -> Result<(), ImportError> {
            for group in groups {
                let ids: Vec<i64> = group
                    .ids
                    .iter()
                    .copied()
                    .filter(|id| !removed.contains(&(kind, *id)))
                    .collect();
                if ids.len() < 2 {
                    continue;
                }
                let (keep, redundant) = (ids[0], &ids[1..]);
                result.stats.same_table_groups += 1;
                result.stats.same_table_found += redundant.len();
                result.details.push(DedupeDetail {
                    reason: DuplicateReason::SameTable,
                    name: group.name.clone(),
                    kept_kind: kind,
                    kept_id: keep,
                    removed_kind: kind,
                    removed_ids: redundant.to_vec(),
                });
                if !options.dry_run {
                    for &id in redundant {
                        delete_row(conn, kind, id, &mut result);
                    }
                }
            }
            Ok(())
        })?;
    }

    log::info!(
        "Duplicates: {} cross-domain, {} same-table in {} groups; {} deleted, {} failed",
        result.stats.cross_domain_found,
        result.stats.same_table_found,
        result.stats.same_table_groups,
        result.stats.deleted,
        result.stats.failed,
    );

    Ok(result)
}

/// Delete one row and its properties atomically. Failures are recorded,
/// not returned.
fn delete_row(conn: &Connection, kind: ItemKind, id: i64, result: &mut DedupeResult) -> bool {
    let attempt = conn
        .execute_batch("SAVEPOINT dedupe_row")
        .map_err(OperationError::from)
        .and_then(|()| delete_item(conn, kind, id));

    match attempt {
        Ok(()) => {
            let _ = conn.execute_batch("RELEASE dedupe_row");
            result.stats.deleted += 1;
            true
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO dedupe_row; RELEASE dedupe_row");
            log::warn!("Failed to delete {kind} #{id}: {e}");
            result.stats.failed += 1;
            result.errors.push(ImportIssue::new(
                IssueKind::Database,
                format!("{kind} #{id}"),
                format!("delete failed: {e}"),
            ));
            false
        }
    }
}
