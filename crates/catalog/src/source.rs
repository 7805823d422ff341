use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::{fallback_tables, CatalogError, MetadataSnapshot, TableDescriptor};

/// Anything that can list table descriptors.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<TableDescriptor>, CatalogError>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}

/// Fixed in-memory descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tables: Vec<TableDescriptor>,
}

impl StaticCatalog {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self { tables }
    }

    /// The built-in demo schema.
    pub fn fallback() -> Self {
        Self::new(fallback_tables())
    }
}

#[async_trait]
impl MetadataSource for StaticCatalog {
    async fn fetch(&self) -> Result<Vec<TableDescriptor>, CatalogError> {
        Ok(self.tables.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    Live,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub snapshot: MetadataSnapshot,
    pub origin: SnapshotOrigin,
}

/// Load a snapshot from `source`.
///
/// An unconfigured source yields the fallback tables. Every other failure is
/// returned as is; a configured but unreachable database is never masked. A
/// live source that lists zero tables produces an empty live snapshot.
pub async fn load_snapshot(source: &dyn MetadataSource) -> Result<LoadedSnapshot, CatalogError> {
    match source.fetch().await {
        Ok(tables) => {
            let snapshot = MetadataSnapshot::new(tables)?;
            if snapshot.is_empty() {
                warn!(source = source.name(), "metadata source returned no tables");
            }
            info!(source = source.name(), tables = snapshot.len(), "metadata snapshot loaded");
            Ok(LoadedSnapshot {
                snapshot,
                origin: SnapshotOrigin::Live,
            })
        }
        Err(CatalogError::NotConfigured) => {
            warn!(
                source = source.name(),
                "no database configured, serving fallback metadata"
            );
            let snapshot = MetadataSnapshot::new(fallback_tables())?;
            Ok(LoadedSnapshot {
                snapshot,
                origin: SnapshotOrigin::Fallback,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(CatalogError);

    #[async_trait]
    impl MetadataSource for Failing {
        async fn fetch(&self) -> Result<Vec<TableDescriptor>, CatalogError> {
            Err(self.0.clone())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn not_configured_uses_fallback() {
        let loaded = load_snapshot(&Failing(CatalogError::NotConfigured))
            .await
            .unwrap();
        assert_eq!(loaded.origin, SnapshotOrigin::Fallback);
        assert_eq!(loaded.snapshot.len(), 8);
        assert_eq!(loaded.snapshot.get(0).unwrap().qualified_name, "customers");
    }

    #[tokio::test]
    async fn connection_failure_is_not_masked() {
        let err = load_snapshot(&Failing(CatalogError::Connection("refused".into())))
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::Connection("refused".into()));
    }

    #[tokio::test]
    async fn query_failure_is_not_masked() {
        let err = load_snapshot(&Failing(CatalogError::Query("boom".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Query(_)));
    }

    #[tokio::test]
    async fn empty_live_source_stays_live() {
        let loaded = load_snapshot(&StaticCatalog::new(vec![])).await.unwrap();
        assert_eq!(loaded.origin, SnapshotOrigin::Live);
        assert!(loaded.snapshot.is_empty());
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let dup = TableDescriptor::new("t", "", ["a"]);
        let err = load_snapshot(&StaticCatalog::new(vec![dup.clone(), dup]))
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTable("t".into()));
    }
}
