//! Name matching against a set of known catalog names.
//!
//! Builds an ordered index keyed by normalized name. Lookups try an exact key
//! first, then (when the policy allows) a containment search over all keys.
//! The index is a `BTreeMap`, so containment results never depend on hash
//! iteration order.

use std::collections::BTreeMap;

use crate::normalize::normalize;

/// Keys this short or shorter never take part in containment matching,
/// otherwise "El" or "Um" would match half the catalog.
const MIN_SUBSTRING_LEN: usize = 3;

/// How far a lookup may go beyond an exact key match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Only exact normalized-key matches.
    ExactOnly,
    /// Exact first, then containment in either direction.
    ExactOrSubstring,
}

/// How a match was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch<'a, V> {
    /// Canonical display name stored in the index.
    pub name: &'a str,
    pub value: &'a V,
    pub kind: MatchKind,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    name: String,
    value: V,
}

/// An index of canonical names, keyed by normalized name.
#[derive(Debug, Clone)]
pub struct NameIndex<V> {
    by_key: BTreeMap<String, Entry<V>>,
}

impl<V> Default for NameIndex<V> {
    fn default() -> Self {
        Self {
            by_key: BTreeMap::new(),
        }
    }
}

impl<V> NameIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canonical name. Returns `false` if the normalized key was
    /// already present; the first entry for a key is kept.
    pub fn insert(&mut self, name: &str, value: V) -> bool {
        let key = normalize(name);
        if key.is_empty() || self.by_key.contains_key(&key) {
            return false;
        }
        self.by_key.insert(
            key,
            Entry {
                name: name.to_string(),
                value,
            },
        );
        true
    }

    /// Find the best match for `query`.
    ///
    /// An exact normalized-key match always wins. Otherwise, under
    /// [`MatchPolicy::ExactOrSubstring`], any key that contains the query or is
    /// contained by it is a candidate, provided both are longer than three
    /// characters. Among candidates, the one whose length is closest to the
    /// query's wins; ties go to the lexicographically smallest key.
    pub fn find(&self, query: &str, policy: MatchPolicy) -> Option<NameMatch<'_, V>> {
        let key = normalize(query);
        if key.is_empty() {
            return None;
        }

        if let Some(entry) = self.by_key.get(&key) {
            return Some(NameMatch {
                name: &entry.name,
                value: &entry.value,
                kind: MatchKind::Exact,
            });
        }

        if policy == MatchPolicy::ExactOnly || key.chars().count() <= MIN_SUBSTRING_LEN {
            return None;
        }

        let query_len = key.chars().count();
        let mut best: Option<(usize, &Entry<V>)> = None;
        for (candidate, entry) in &self.by_key {
            let candidate_len = candidate.chars().count();
            if candidate_len <= MIN_SUBSTRING_LEN {
                continue;
            }
            if !candidate.contains(key.as_str()) && !key.contains(candidate.as_str()) {
                continue;
            }
            let distance = candidate_len.abs_diff(query_len);
            // Strict comparison keeps the first (smallest) key on ties.
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, entry));
            }
        }

        best.map(|(_, entry)| NameMatch {
            name: &entry.name,
            value: &entry.value,
            kind: MatchKind::Substring,
        })
    }

    /// Replace the display name stored under `name`'s normalized key.
    /// Returns `false` if the key is absent.
    pub fn rename(&mut self, name: &str) -> bool {
        match self.by_key.get_mut(&normalize(name)) {
            Some(entry) => {
                entry.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for NameIndex<V> {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (name, value) in iter {
            index.insert(name, value);
        }
        index
    }
}
