use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::{CatalogConfig, CatalogError, MetadataSource, TableDescriptor};

const TABLES_QUERY: &str = r#"
    SELECT
        n.nspname::text      AS table_schema,
        c.relname::text      AS table_name,
        d.description::text  AS description
    FROM pg_class c
    JOIN pg_namespace n ON n.oid = c.relnamespace
    LEFT JOIN pg_description d ON d.objoid = c.oid AND d.objsubid = 0
    WHERE c.relkind = 'r'
      AND n.nspname::text <> ALL($1)
    ORDER BY n.nspname, c.relname
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        table_schema::text AS table_schema,
        table_name::text   AS table_name,
        column_name::text  AS column_name
    FROM information_schema.columns
    WHERE table_schema::text <> ALL($1)
    ORDER BY table_schema, table_name, ordinal_position
"#;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TableRow {
    pub table_schema: String,
    pub table_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnRow {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
}

/// Live metadata read from a PostgreSQL system catalog.
///
/// Opens one short-lived connection per [`fetch`](MetadataSource::fetch);
/// nothing is pooled because metadata is read at startup and on reload only.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    config: CatalogConfig,
}

impl PostgresCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.database_url.is_some()
    }

    async fn connect(&self, url: &str) -> Result<PgConnection, CatalogError> {
        let timeout = Duration::from_secs(self.config.connect_timeout_secs.max(1));
        match tokio::time::timeout(timeout, PgConnection::connect(url)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(err)) => Err(CatalogError::Connection(err.to_string())),
            Err(_) => Err(CatalogError::Connection(format!(
                "timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl MetadataSource for PostgresCatalog {
    async fn fetch(&self) -> Result<Vec<TableDescriptor>, CatalogError> {
        let url = self
            .config
            .database_url
            .as_deref()
            .ok_or(CatalogError::NotConfigured)?;

        let mut conn = self.connect(url).await?;
        debug!("connected to metadata database");

        let excluded = self.config.excluded_schemas.clone();
        let tables = sqlx::query_as::<_, TableRow>(TABLES_QUERY)
            .bind(&excluded)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| CatalogError::Query(e.to_string()))?;
        let columns = sqlx::query_as::<_, ColumnRow>(COLUMNS_QUERY)
            .bind(&excluded)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| CatalogError::Query(e.to_string()))?;

        if let Err(err) = conn.close().await {
            debug!(error = %err, "closing metadata connection failed");
        }

        let descriptors = assemble_descriptors(tables, columns, &self.config.default_schema);
        info!(tables = descriptors.len(), "loaded live table metadata");
        Ok(descriptors)
    }

    fn name(&self) -> &str {
        "postgres"
    }
}

/// Join table rows with their columns.
///
/// Output follows `tables` order. Columns keep their input order; tables with
/// no column rows get an empty list and a missing comment becomes `""`.
pub fn assemble_descriptors(
    tables: Vec<TableRow>,
    columns: Vec<ColumnRow>,
    default_schema: &str,
) -> Vec<TableDescriptor> {
    let mut by_table: HashMap<(String, String), Vec<String>> = HashMap::new();
    for col in columns {
        by_table
            .entry((col.table_schema, col.table_name))
            .or_default()
            .push(col.column_name);
    }

    tables
        .into_iter()
        .map(|row| {
            let columns = by_table
                .remove(&(row.table_schema.clone(), row.table_name.clone()))
                .unwrap_or_default();
            let qualified_name = display_name(&row.table_schema, &row.table_name, default_schema);
            TableDescriptor {
                qualified_name,
                description: row.description.unwrap_or_default(),
                columns,
            }
        })
        .collect()
}

/// Bare name inside the default schema, `schema.table` elsewhere. Parts
/// containing `.` or `"` are double-quoted and always schema-qualified.
fn display_name(schema: &str, table: &str, default_schema: &str) -> String {
    if schema == default_schema && !needs_quoting(table) {
        return table.to_string();
    }
    format!("{}.{}", quote_part(schema), quote_part(table))
}

fn needs_quoting(part: &str) -> bool {
    part.contains('.') || part.contains('"')
}

fn quote_part(part: &str) -> String {
    if needs_quoting(part) {
        format!("\"{}\"", part.replace('"', "\"\""))
    } else {
        part.to_string()
    }
}
