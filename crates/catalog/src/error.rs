use thiserror::Error;

/// Errors surfaced while loading table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No database connection string is configured. The only recoverable
    /// kind: it routes metadata loading to the static fallback.
    #[error("database not configured: set SUPABASE_DB_URL or DATABASE_URL")]
    NotConfigured,
    /// A connection string is present but the database could not be reached.
    #[error("database connection failed: {0}")]
    Connection(String),
    /// Connected, but a catalog query failed.
    #[error("catalog query failed: {0}")]
    Query(String),
    /// Two descriptors share a qualified name.
    #[error("duplicate table in metadata snapshot: {0}")]
    DuplicateTable(String),
}

impl CatalogError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, CatalogError::NotConfigured)
    }
}
