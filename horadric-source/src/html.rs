//! Scraped HTML catalog pages.
//!
//! A listing page contains one fragment per item. Each fragment yields a
//! display name, an optional image path, and its property lines. A
//! `data-kind` attribute on the fragment overrides the page's default kind.

use std::path::Path;

use horadric_catalog::ItemKind;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::item::{SourceItem, SourceProperty};

/// CSS selectors locating items and their parts on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlSelectors {
    /// One match per item.
    pub item: String,
    /// Display name, relative to the item.
    pub name: String,
    /// Image element, relative to the item.
    pub image: String,
    /// One match per property line, relative to the item.
    pub properties: String,
}

impl Default for HtmlSelectors {
    fn default() -> Self {
        Self {
            item: "div.item".to_string(),
            name: ".item-name".to_string(),
            image: "img".to_string(),
            properties: ".item-props li".to_string(),
        }
    }
}

struct Compiled {
    item: Selector,
    name: Selector,
    image: Selector,
    properties: Selector,
}

fn compile(s: &str) -> Result<Selector, SourceError> {
    Selector::parse(s).map_err(|_| SourceError::Selector(s.to_string()))
}

impl HtmlSelectors {
    fn compile(&self) -> Result<Compiled, SourceError> {
        Ok(Compiled {
            item: compile(&self.item)?,
            name: compile(&self.name)?,
            image: compile(&self.image)?,
            properties: compile(&self.properties)?,
        })
    }
}

/// Collapse runs of whitespace and trim.
fn clean_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: ElementRef) -> String {
    clean_text(el.text())
}

/// Parse a listing page.
///
/// Fragments without a name are skipped. Items take `default_kind` unless
/// their fragment declares a recognized `data-kind`.
pub fn parse_html(
    content: &str,
    selectors: &HtmlSelectors,
    default_kind: ItemKind,
    source_name: &str,
) -> Result<Vec<SourceItem>, SourceError> {
    let sel = selectors.compile()?;
    let document = Html::parse_document(content);

    let mut items = Vec::new();
    for fragment in document.select(&sel.item) {
        let Some(name) = fragment
            .select(&sel.name)
            .next()
            .map(element_text)
            .filter(|n| !n.is_empty())
        else {
            log::debug!("Skipping unnamed item fragment in {source_name}");
            continue;
        };

        let kind = match fragment.value().attr("data-kind") {
            Some(k) => ItemKind::from_str_loose(k).unwrap_or_else(|| {
                log::warn!("Unknown data-kind '{k}' on '{name}' in {source_name}");
                default_kind
            }),
            None => default_kind,
        };

        let mut item = SourceItem::new(kind, name, source_name);
        item.image = fragment.select(&sel.image).next().and_then(|img| {
            img.value()
                .attr("src")
                .or_else(|| img.value().attr("data-src"))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        });
        item.properties = fragment
            .select(&sel.properties)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .map(SourceProperty::Text)
            .collect();
        items.push(item);
    }

    Ok(items)
}

/// Read and parse a listing page from disk.
pub fn parse_html_file(
    path: &Path,
    selectors: &HtmlSelectors,
    default_kind: ItemKind,
) -> Result<Vec<SourceItem>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    let source_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();
    parse_html(&content, selectors, default_kind, &source_name)
}

#[cfg(test)]
#[path = "tests/html_tests.rs"]
mod tests;
