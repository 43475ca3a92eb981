//! Run reports: per-item issues, deadlines, and the summary of a full import.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use horadric_catalog::ItemKind;
use horadric_source::ParseError;
use serde::Serialize;

use crate::dedupe::{DedupeDetail, DedupeStats};
use crate::images::ImageStats;
use crate::items::KindStats;
use crate::runewords::CompositeStats;

/// What went wrong with a single item or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A malformed source row or page.
    Parse,
    /// A referenced item, rune, or image has no match.
    NotFound,
    /// A runeword's rune has no stored icon.
    MissingRuneIcon,
    /// Fetching or storing an image failed.
    UploadFailure,
    /// A single-row write failed.
    Database,
    /// The run's deadline passed.
    Deadline,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::NotFound => "not found",
            Self::MissingRuneIcon => "missing rune icon",
            Self::UploadFailure => "upload failure",
            Self::Database => "database",
            Self::Deadline => "deadline",
        }
    }
}

/// A non-fatal problem recorded during a run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub kind: IssueKind,
    /// The item, file, or row the issue is about.
    pub subject: String,
    pub message: String,
}

impl ImportIssue {
    pub fn new(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl From<&ParseError> for ImportIssue {
    fn from(e: &ParseError) -> Self {
        Self::new(
            IssueKind::Parse,
            format!("{}:{}", e.file, e.line),
            e.message.clone(),
        )
    }
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.as_str(), self.subject, self.message)
    }
}

// ── Deadline ────────────────────────────────────────────────────────────────

/// A point in time after which no new item is started.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map(Self::after).unwrap_or_default()
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

// ── Import Report ───────────────────────────────────────────────────────────

/// Everything a run did, returned to the caller. Never persisted.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub items: BTreeMap<ItemKind, KindStats>,
    /// Built-in and class skill stats added to the registry.
    pub stats_seeded: usize,
    /// Property texts no stat code matched, sorted.
    pub missing_stat_codes: Vec<String>,
    pub images: ImageStats,
    /// Items no image could be found for.
    pub missing_images: Vec<String>,
    pub composites: CompositeStats,
    pub dedupe: DedupeStats,
    pub duplicates: Vec<DedupeDetail>,
    pub errors: Vec<ImportIssue>,
    pub timed_out: bool,
    pub dry_run: bool,
    /// ID of the import log row, when one was kept.
    pub log_id: Option<i64>,
}

impl ImportReport {
    pub fn stats_for(&self, kind: ItemKind) -> KindStats {
        self.items.get(&kind).cloned().unwrap_or_default()
    }

    pub fn total_imported(&self) -> usize {
        self.items.values().map(|s| s.imported).sum()
    }

    pub fn total_renamed(&self) -> usize {
        self.items.values().map(|s| s.renamed).sum()
    }

    pub fn total_unchanged(&self) -> usize {
        self.items.values().map(|s| s.unchanged).sum()
    }

    pub(crate) fn record_timeout(&mut self, phase: &str) {
        if self.timed_out {
            return;
        }
        log::warn!("Deadline reached during {phase}; stopping");
        self.timed_out = true;
        self.errors.push(ImportIssue::new(
            IssueKind::Deadline,
            phase,
            "deadline reached before all items were processed",
        ));
    }
}
