//! Items as read from a source, before matching against the catalog.

use horadric_catalog::{CatalogItem, ItemKind};

/// A property as a source states it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceProperty {
    /// A table column group: stat code, optional parameter, value range.
    Coded {
        code: String,
        param: Option<String>,
        min: Option<i32>,
        max: Option<i32>,
    },
    /// A display line such as "+150 To Attack Rating".
    Text(String),
}

/// One item read from a table row or an HTML listing.
#[derive(Debug, Clone, Default)]
pub struct SourceItem {
    pub kind: ItemKind,
    pub name: String,
    pub code: Option<String>,
    pub base_code: Option<String>,
    pub set_name: Option<String>,
    pub level_req: Option<i32>,
    pub runes: Vec<String>,
    pub base_types: Vec<String>,
    pub properties: Vec<SourceProperty>,
    /// Image path as declared by an HTML page, relative to the site root.
    pub image: Option<String>,
    /// File the item was read from.
    pub source: String,
}

impl SourceItem {
    pub fn new(kind: ItemKind, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    /// A new catalog row carrying this item's fields.
    pub fn to_catalog_item(&self) -> CatalogItem {
        CatalogItem {
            kind: self.kind,
            code: self.code.clone(),
            name: self.name.clone(),
            base_code: self.base_code.clone(),
            set_name: self.set_name.clone(),
            level_req: self.level_req,
            runes: self.runes.clone(),
            base_types: self.base_types.clone(),
            source: self.source.clone(),
            ..Default::default()
        }
    }
}
