//! Table metadata for schema retrieval.
//!
//! A [`MetadataSource`] lists [`TableDescriptor`]s; [`load_snapshot`] turns
//! that list into an immutable [`MetadataSnapshot`], falling back to a small
//! built-in schema when no database is configured.
//!
//! ```
//! use catalog::{load_snapshot, CatalogConfig, PostgresCatalog, SnapshotOrigin};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // No database URL: the built-in schema is served instead.
//! let source = PostgresCatalog::new(CatalogConfig::default());
//! let loaded = load_snapshot(&source).await.unwrap();
//! assert_eq!(loaded.origin, SnapshotOrigin::Fallback);
//! assert!(loaded.snapshot.get(0).unwrap().summary().starts_with("Table: customers."));
//! # }
//! ```

mod config;
mod error;
mod fallback;
mod postgres;
mod source;
mod types;

pub use config::{database_url_from, redact_url, CatalogConfig, DATABASE_URL_VARS};
pub use error::CatalogError;
pub use fallback::fallback_tables;
pub use postgres::{assemble_descriptors, ColumnRow, PostgresCatalog, TableRow};
pub use source::{load_snapshot, LoadedSnapshot, MetadataSource, SnapshotOrigin, StaticCatalog};
pub use types::{MetadataSnapshot, TableDescriptor};
