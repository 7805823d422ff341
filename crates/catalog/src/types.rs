use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::CatalogError;

/// One table as the retriever and prompt builder see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Bare table name in the default schema, `schema.table` otherwise.
    #[serde(rename = "table")]
    pub qualified_name: String,
    /// Table comment; empty when the catalog has none.
    #[serde(default)]
    pub description: String,
    /// Column names in declaration order.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl TableDescriptor {
    pub fn new(
        qualified_name: impl Into<String>,
        description: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            description: description.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Text embedded for similarity search.
    pub fn summary(&self) -> String {
        format!(
            "Table: {}. Description: {}. Columns: {}",
            self.qualified_name,
            self.description,
            self.columns.join(", ")
        )
    }
}

/// Immutable, ordered set of table descriptors.
///
/// Cloning is cheap; all clones share the same storage. Position `i` is the
/// identity the similarity index uses for row `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSnapshot {
    tables: Arc<[TableDescriptor]>,
}

impl MetadataSnapshot {
    /// Build a snapshot, rejecting duplicate qualified names.
    pub fn new(tables: Vec<TableDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(tables.len());
        for table in &tables {
            if !seen.insert(table.qualified_name.as_str()) {
                return Err(CatalogError::DuplicateTable(table.qualified_name.clone()));
            }
        }
        Ok(Self {
            tables: tables.into(),
        })
    }

    pub fn empty() -> Self {
        Self {
            tables: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&TableDescriptor> {
        self.tables.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableDescriptor> {
        self.tables.iter()
    }

    pub fn as_slice(&self) -> &[TableDescriptor] {
        &self.tables
    }
}

impl Default for MetadataSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a MetadataSnapshot {
    type Item = &'a TableDescriptor;
    type IntoIter = std::slice::Iter<'a, TableDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
