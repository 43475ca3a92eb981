//! SQLite persistence layer for the item catalog.
//!
//! Provides schema creation, row operations, and query APIs
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, delete_item, insert_import_log, insert_item, insert_properties,
    insert_stat_code, update_item_image, update_item_name,
};
pub use queries::{
    CatalogStats, CrossDomainDuplicate, DuplicateGroup, catalog_stats, count_items,
    cross_domain_duplicates, duplicate_name_groups, get_item, list_import_logs,
    list_items, list_stat_codes, properties_for_item, property_count,
};
pub use schema::{SchemaError, open_database, open_memory, table_name};
