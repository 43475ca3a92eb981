//! The stat registry: every canonical stat code and the aliases that map
//! onto it.
//!
//! A registry is an explicit value loaded from the database and passed by
//! reference to whatever needs it. Seeding is additive; existing codes are
//! never overwritten.

use std::collections::HashMap;

use horadric_catalog::builtin_stats::BUILTIN_STATS;
use horadric_catalog::{CharacterClass, StatCategory, StatCode};
use horadric_db::{OperationError, insert_stat_code, list_stat_codes};
use rusqlite::Connection;
use thiserror::Error;

use crate::property::template_key;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("Unknown stat code or alias '{0}'")]
    NotFound(String),
}

/// Prefix of stat codes generated from class skills.
pub const SKILL_CODE_PREFIX: &str = "skill:";

/// Loaded stat codes with lookup indexes.
#[derive(Debug, Default)]
pub struct StatRegistry {
    stats: Vec<StatCode>,
    by_code: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    /// Lower-cased aliases and codes, for case-insensitive lookups.
    by_alias_lower: HashMap<String, usize>,
    by_template: HashMap<String, usize>,
}

impl StatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every persisted stat code. Loading twice yields the same registry.
    pub fn load(conn: &Connection) -> Result<Self, RegistryError> {
        Ok(Self::from_stats(list_stat_codes(conn)?))
    }

    /// Build a registry from stat codes, in the order given. The first code
    /// to claim an alias or template keeps it.
    pub fn from_stats(stats: Vec<StatCode>) -> Self {
        let mut registry = Self {
            stats,
            ..Default::default()
        };
        for (i, stat) in registry.stats.iter().enumerate() {
            registry.by_code.insert(stat.code.clone(), i);
            registry
                .by_alias_lower
                .entry(stat.code.to_lowercase())
                .or_insert(i);
        }
        for (i, stat) in registry.stats.iter().enumerate() {
            for alias in &stat.aliases {
                if registry.by_code.contains_key(alias) {
                    continue;
                }
                if let Some(&owner) = registry.by_alias.get(alias) {
                    log::debug!(
                        "Alias '{alias}' of '{}' already maps to '{}'",
                        stat.code,
                        registry.stats[owner].code
                    );
                    continue;
                }
                registry.by_alias.insert(alias.clone(), i);
                registry.by_alias_lower.entry(alias.to_lowercase()).or_insert(i);
            }
            if !stat.description.is_empty() {
                registry
                    .by_template
                    .entry(template_key(&stat.description))
                    .or_insert(i);
            }
        }
        registry
    }

    /// Insert built-in stats the store doesn't have yet, then reload.
    /// Returns how many were inserted.
    pub fn seed_from_builtins(&mut self, conn: &Connection) -> Result<usize, RegistryError> {
        let mut inserted = 0;
        for builtin in BUILTIN_STATS {
            if insert_stat_code(conn, &builtin.to_stat_code())? {
                inserted += 1;
            }
        }
        *self = Self::load(conn)?;
        Ok(inserted)
    }

    /// Insert one stat per class skill, then reload. Returns how many were
    /// inserted.
    pub fn seed_from_classes(
        &mut self,
        conn: &Connection,
        classes: &[CharacterClass],
    ) -> Result<usize, RegistryError> {
        let mut inserted = 0;
        for class in classes {
            for stat in class_skill_stats(class) {
                if insert_stat_code(conn, &stat)? {
                    inserted += 1;
                }
            }
        }
        *self = Self::load(conn)?;
        Ok(inserted)
    }

    /// Resolve a canonical code or alias, case-sensitively. Codes take
    /// precedence over aliases.
    pub fn resolve(&self, code_or_alias: &str) -> Result<&StatCode, RegistryError> {
        self.by_code
            .get(code_or_alias)
            .or_else(|| self.by_alias.get(code_or_alias))
            .map(|&i| &self.stats[i])
            .ok_or_else(|| RegistryError::NotFound(code_or_alias.to_string()))
    }

    /// The stat whose description template has the given key.
    pub fn match_template(&self, key: &str) -> Option<&StatCode> {
        self.by_template.get(key).map(|&i| &self.stats[i])
    }

    /// Find a class skill stat by skill name or ID, ignoring case.
    pub fn find_skill(&self, name_or_id: &str) -> Option<&StatCode> {
        let needle = name_or_id.trim().to_lowercase();
        let by_code = format!("{SKILL_CODE_PREFIX}{needle}");
        self.by_alias_lower
            .get(&needle)
            .or_else(|| self.by_alias_lower.get(&by_code))
            .map(|&i| &self.stats[i])
            .filter(|s| s.code.starts_with(SKILL_CODE_PREFIX))
    }

    /// Number of known codes.
    pub fn count(&self) -> usize {
        self.stats.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatCode> {
        self.stats.iter()
    }
}

/// Stat codes for every skill a class has.
pub fn class_skill_stats(class: &CharacterClass) -> Vec<StatCode> {
    class
        .skills()
        .map(|skill| StatCode {
            code: format!("{SKILL_CODE_PREFIX}{}", skill.id),
            name: skill.name.clone(),
            description: format!("+# To {} ({} Only)", skill.name, class.name),
            category: StatCategory::Skills,
            aliases: vec![skill.name.clone(), skill.id.clone()],
            is_variable: true,
        })
        .collect()
}
