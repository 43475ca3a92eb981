//! Data model types for the item catalog.
//!
//! These types represent the persistent catalog schema: items of every kind,
//! stat codes and their aliases, item property assignments, and import
//! tracking. Class skill trees are human-curated and loaded from YAML.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

// ── Item Kind ───────────────────────────────────────────────────────────────

/// The category an item belongs to. Each kind lives in its own table.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Unique,
    Set,
    Runeword,
    Rune,
    Gem,
    #[default]
    Base,
    Quest,
}

impl ItemKind {
    /// Every kind, in import order.
    pub const ALL: [ItemKind; 7] = [
        Self::Base,
        Self::Rune,
        Self::Gem,
        Self::Quest,
        Self::Unique,
        Self::Set,
        Self::Runeword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Set => "set",
            Self::Runeword => "runeword",
            Self::Rune => "rune",
            Self::Gem => "gem",
            Self::Base => "base",
            Self::Quest => "quest",
        }
    }

    /// Parse a kind name, accepting common plural and long forms.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unique" | "uniques" | "unique_items" => Some(Self::Unique),
            "set" | "sets" | "set_items" | "setitem" => Some(Self::Set),
            "runeword" | "runewords" => Some(Self::Runeword),
            "rune" | "runes" => Some(Self::Rune),
            "gem" | "gems" => Some(Self::Gem),
            "base" | "bases" | "base_items" | "weapon" | "armor" => Some(Self::Base),
            "quest" | "quests" | "quest_items" => Some(Self::Quest),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Item ────────────────────────────────────────────────────────────────────

/// The identity of a catalog row: enough to match, report, and delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemIdentity {
    pub kind: ItemKind,
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    /// Normalized form of `name`, see [`normalize`].
    pub key: String,
}

/// A persisted catalog row of any kind.
///
/// Kind-specific fields are left empty for kinds that don't use them.
#[derive(Debug, Clone, Default)]
pub struct CatalogItem {
    pub id: i64,
    pub kind: ItemKind,
    /// Game code (e.g. "r01" for El, "cap" for a Cap base).
    pub code: Option<String>,
    pub name: String,
    /// Code of the base item a unique or set item is built on.
    pub base_code: Option<String>,
    /// Owning set for set items.
    pub set_name: Option<String>,
    pub level_req: Option<i32>,
    /// Rune codes in socket order. Runewords only.
    pub runes: Vec<String>,
    /// Item types a runeword can be made in. Runewords only.
    pub base_types: Vec<String>,
    pub image_url: Option<String>,
    /// Blob store key backing `image_url`.
    pub image_key: Option<String>,
    /// Where the row came from: "table", "html", or a file name.
    pub source: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CatalogItem {
    /// Create an empty row of the given kind, ready to be filled and inserted.
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn identity(&self) -> ItemIdentity {
        ItemIdentity {
            kind: self.kind,
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            key: normalize(&self.name),
        }
    }

    /// True when the row already carries a non-empty image URL.
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

// ── Stat Codes ──────────────────────────────────────────────────────────────

/// Grouping used by filters and reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Offense,
    Defense,
    Attributes,
    Resistance,
    Skills,
    Utility,
    #[default]
    Misc,
}

impl StatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
            Self::Attributes => "attributes",
            Self::Resistance => "resistance",
            Self::Skills => "skills",
            Self::Utility => "utility",
            Self::Misc => "misc",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "offense" | "offence" => Self::Offense,
            "defense" | "defence" => Self::Defense,
            "attributes" | "attribute" => Self::Attributes,
            "resistance" | "resist" | "resists" => Self::Resistance,
            "skills" | "skill" => Self::Skills,
            "utility" => Self::Utility,
            _ => Self::Misc,
        }
    }
}

/// A canonical stat with every alias that maps onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCode {
    pub code: String,
    pub name: String,
    /// Display template with `#` standing in for the value,
    /// e.g. "+# To Attack Rating".
    pub description: String,
    pub category: StatCategory,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Whether the stat rolls within a range on items.
    pub is_variable: bool,
}

// ── Properties ──────────────────────────────────────────────────────────────

/// Code used for properties no stat mapping exists for.
pub const RAW_STAT_CODE: &str = "raw";

/// A stat (or unresolved text) attached to an item with its value range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyAssignment {
    /// Canonical stat code, or [`RAW_STAT_CODE`].
    pub code: String,
    /// Extra parameter (skill name, charge level, ...), if any.
    pub param: Option<String>,
    pub min: i32,
    pub max: i32,
    /// Original source text. Always set for raw assignments.
    pub raw_text: Option<String>,
}

impl PropertyAssignment {
    pub fn new(code: impl Into<String>, min: i32, max: i32) -> Self {
        Self {
            code: code.into(),
            param: None,
            min,
            max,
            raw_text: None,
        }
    }

    /// An unresolved property that keeps `text` verbatim.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            code: RAW_STAT_CODE.to_string(),
            param: None,
            min: 0,
            max: 0,
            raw_text: Some(text.into()),
        }
    }

    pub fn is_raw(&self) -> bool {
        self.code == RAW_STAT_CODE
    }

    /// A fixed value rather than a range.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// A persisted property row.
#[derive(Debug, Clone)]
pub struct ItemProperty {
    pub id: i64,
    pub kind: ItemKind,
    pub item_id: i64,
    pub position: i32,
    pub assignment: PropertyAssignment,
}

// ── Classes ─────────────────────────────────────────────────────────────────

/// A character class and its skill trees, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterClass {
    pub id: String,
    pub name: String,
    /// Three-letter game code (e.g. "bar", "sor").
    pub short_name: String,
    #[serde(default)]
    pub trees: Vec<SkillTree>,
}

/// One of a class's skill tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTree {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub required_level: Option<u32>,
}

impl CharacterClass {
    /// All skills across every tree, in tree order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.trees.iter().flat_map(|t| t.skills.iter())
    }
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Summary row written once per import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportLog {
    pub id: i64,
    pub source_type: String,
    pub source_name: String,
    pub imported_at: String,
    pub records_created: i64,
    pub records_updated: i64,
    pub records_unchanged: i64,
    pub errors: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncategorized_stats_are_misc() {
        assert_eq!(StatCategory::default(), StatCategory::Misc);
        assert_eq!(StatCategory::default().as_str(), "misc");
    }

    #[test]
    fn kind_round_trips_through_its_name() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_str_loose(kind.as_str()), Some(kind));
        }
    }
}
