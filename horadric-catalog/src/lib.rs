//! Item catalog data model, name normalization/matching, and curated data loading.
//!
//! This crate defines the catalog model without any database dependencies.
//! Everything that decides whether two names denote the same item lives here,
//! so both the importer and the duplicate cleanup share one definition.

pub mod builtin_stats;
pub mod matcher;
pub mod normalize;
pub mod types;
pub mod yaml;

pub use matcher::{MatchKind, MatchPolicy, NameIndex, NameMatch};
pub use normalize::normalize;
pub use types::*;
pub use yaml::{load_classes, YamlError};
