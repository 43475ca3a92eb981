//! Source readers for item data: tab-delimited game tables, scraped HTML
//! listing pages, and image manifests.

pub mod error;
pub mod html;
pub mod image_map;
pub mod item;
pub mod tables;
pub mod tabular;

pub use error::{ParseError, SourceError};
pub use html::{HtmlSelectors, parse_html, parse_html_file};
pub use image_map::{ImageLookup, ImageMap};
pub use item::{SourceItem, SourceProperty};
pub use tables::{
    MappedTable, TableFailure, TableKind, map_table, misc_kind, read_table_file, read_tables_dir,
};
pub use tabular::{Table, TableRow};
