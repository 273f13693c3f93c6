//! Bilingual medical-education content library.
//!
//! This crate provides:
//! - Typed content repositories for oncology, lab tests, lab panels,
//!   educational topics and anatomical regions
//! - Case-insensitive substring search and relevance ranking over the
//!   designated fields of every schema
//! - A cross-domain catalog, content validation and JSON snapshots
//!
//! # Quick Start
//!
//! ```
//! use medref_core::content::oncology::{get_oncology_condition, search_oncology};
//!
//! let condition = get_oncology_condition("breast-cancer").unwrap();
//! assert_eq!(condition.name_es, "Cáncer de mama");
//!
//! let hits = search_oncology("lymph");
//! assert!(!hits.is_empty());
//! ```

// The Searchable derive names this crate by its absolute path.
extern crate self as medref_core;

pub mod catalog;
pub mod config;
pub mod content;
pub mod entry;
pub mod persist;
pub mod repository;
pub mod search;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// Re-export for convenience
pub use medref_macros::Searchable;
pub use search::Searchable;

// Primary public API
pub use catalog::{Catalog, CatalogEntry, CatalogHit, Domain};
pub use config::{ConfigError, EmptyQueryPolicy, LibraryConfig, QueryConfig};
pub use content::education::ComplexityLevel;
pub use entry::{Category, Entry, UnknownCategory};
pub use persist::{ContentSnapshot, DomainEntry, PersistError, SnapshotInfo};
pub use repository::{Repository, RepositoryError};
pub use search::ScoredEntry;
pub use validation::{Validate, ValidationIssue, ValidationReport};
