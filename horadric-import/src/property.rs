//! Reverse resolution of property text into canonical stat assignments.
//!
//! Display text such as "+150 To Attack Rating" is reduced to a template key
//! ("# to attack rating") and looked up against the registry's description
//! templates. Text that matches nothing is kept verbatim under the `raw`
//! code and recorded as a missing stat code.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use horadric_catalog::PropertyAssignment;
use regex::Regex;

use crate::registry::StatRegistry;

/// A value or range, optionally parenthesized: `150`, `5-7`, `(10-20)`.
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?(\d+)(?:\s*-\s*(\d+))?\)?").expect("value pattern is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Parameter names whose value is a skill.
const SKILL_PARAMS: &[&str] = &["skill", "oskill", "aura", "charged", "hit-skill", "gethit-skill"];

/// Template key for property text or a description template.
///
/// Every value or range becomes `#`; `+` and parentheses are dropped; the
/// rest is lower-cased with whitespace collapsed. A description template
/// and any text rendered from it share the same key.
pub fn template_key(text: &str) -> String {
    let replaced = VALUE_RE.replace_all(text, "#");
    let stripped: String = replaced
        .chars()
        .filter(|c| !matches!(c, '+' | '(' | ')'))
        .collect();
    WHITESPACE_RE
        .replace_all(stripped.trim(), " ")
        .to_lowercase()
}

/// The first value or range in `text`, as `(min, max)`.
pub fn extract_value(text: &str) -> Option<(i32, i32)> {
    let caps = VALUE_RE.captures(text)?;
    let min: i32 = caps.get(1)?.as_str().parse().ok()?;
    let max = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => min,
    };
    Some((min.min(max), min.max(max)))
}

/// Resolves property text and coded properties against a loaded registry.
pub struct PropertyResolver<'r> {
    registry: &'r StatRegistry,
    missing: BTreeSet<String>,
}

impl<'r> PropertyResolver<'r> {
    pub fn new(registry: &'r StatRegistry) -> Self {
        Self {
            registry,
            missing: BTreeSet::new(),
        }
    }

    pub fn registry(&self) -> &'r StatRegistry {
        self.registry
    }

    /// Resolve one line of display text.
    ///
    /// An explicit code `hint` is tried before template matching. Text with
    /// no value that matches a valueless template resolves to 1/1. Text
    /// whose value is out of range stays raw.
    pub fn resolve_text(&mut self, text: &str, hint: Option<&str>) -> PropertyAssignment {
        let (min, max) = match extract_value(text) {
            Some(range) => range,
            None if text.bytes().any(|b| b.is_ascii_digit()) => {
                return self.unresolved(text.to_string());
            }
            None => (1, 1),
        };

        let hinted = hint.and_then(|h| self.registry.resolve(h).ok());
        let stat = hinted.or_else(|| self.registry.match_template(&template_key(text)));

        match stat {
            Some(stat) => PropertyAssignment {
                code: stat.code.clone(),
                param: None,
                min,
                max,
                raw_text: Some(text.to_string()),
            },
            None => self.unresolved(text.to_string()),
        }
    }

    /// Resolve a coded property from a game table column group.
    ///
    /// Skill parameters are resolved against class skill names and IDs, so
    /// `skill` with param `Whirlwind` lands on the `skill:whirlwind` code.
    pub fn resolve_code(
        &mut self,
        code: &str,
        param: Option<&str>,
        min: Option<i32>,
        max: Option<i32>,
    ) -> PropertyAssignment {
        let (min, max) = match (min, max) {
            (Some(a), Some(b)) => (a.min(b), a.max(b)),
            (Some(v), None) | (None, Some(v)) => (v, v),
            (None, None) => (1, 1),
        };

        if let Some(param) = param.filter(|_| SKILL_PARAMS.contains(&code)) {
            if let Some(skill) = self.registry.find_skill(param) {
                return PropertyAssignment {
                    code: skill.code.clone(),
                    param: Some(param.to_string()),
                    min,
                    max,
                    raw_text: None,
                };
            }
        }

        match self.registry.resolve(code) {
            Ok(stat) => PropertyAssignment {
                code: stat.code.clone(),
                param: param.map(str::to_string),
                min,
                max,
                raw_text: None,
            },
            Err(_) => {
                let text = match param {
                    Some(p) => format!("{code}[{p}] {min}-{max}"),
                    None => format!("{code} {min}-{max}"),
                };
                let mut assignment = self.unresolved(text);
                assignment.param = param.map(str::to_string);
                assignment
            }
        }
    }

    fn unresolved(&mut self, text: String) -> PropertyAssignment {
        log::debug!("No stat code for '{text}'");
        self.missing.insert(text.clone());
        PropertyAssignment::raw(text)
    }

    /// Distinct texts that fell back to `raw`, sorted.
    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }

    pub fn into_missing(self) -> BTreeSet<String> {
        self.missing
    }
}
