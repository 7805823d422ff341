use crate::config::ServerConfig;
use crate::error::ServerResult;
use catalog::{load_snapshot, MetadataSource, PostgresCatalog, SnapshotOrigin};
use generation::{GeminiGenerator, SqlGenerator};
use metrics_exporter_prometheus::PrometheusHandle;
use schemarag::SchemaIndex;
use semantic::{encoder_from_config, Encoder};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Schema index currently served, and where its metadata came from.
#[derive(Clone)]
pub struct LoadedSchema {
    pub schema: Arc<SchemaIndex>,
    pub origin: SnapshotOrigin,
}

/// Shared application state
///
/// Built completely before the listener is bound. The schema index is only
/// ever replaced as a whole, so a request sees either the old or the new
/// snapshot and vectors, never a mix.
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    pub encoder: Arc<dyn Encoder>,

    pub generator: Arc<dyn SqlGenerator>,

    source: Arc<dyn MetadataSource>,

    current: RwLock<LoadedSchema>,

    /// Serializes reloads so two of them never race on the swap.
    reload_lock: tokio::sync::Mutex<()>,

    metrics: Option<PrometheusHandle>,

    started_at: Instant,
}

/// Result of a successful reload.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadSummary {
    pub tables: usize,
    pub source: SnapshotOrigin,
    pub elapsed_ms: u64,
}

impl ServerState {
    /// Load metadata, build the encoder and schema index, then construct the
    /// generation backend. Any failure aborts startup.
    pub async fn initialize(config: ServerConfig) -> ServerResult<Self> {
        let source: Arc<dyn MetadataSource> =
            Arc::new(PostgresCatalog::new(config.catalog.clone()));
        let loaded = load_snapshot(source.as_ref()).await?;

        let encoder = encoder_from_config(&config.semantic)?;
        let schema = SchemaIndex::build(loaded.snapshot, encoder.as_ref()).await?;

        let generator: Arc<dyn SqlGenerator> = Arc::new(GeminiGenerator::new(&config.generation)?);

        tracing::info!(
            tables = schema.len(),
            source = ?loaded.origin,
            encoder = encoder.model_name(),
            generator = generator.name(),
            "server state initialized"
        );

        Ok(Self::assemble(
            config,
            source,
            encoder,
            generator,
            LoadedSchema {
                schema: Arc::new(schema),
                origin: loaded.origin,
            },
        ))
    }

    /// Build state from explicit parts; metadata is still loaded from
    /// `source` and indexed with `encoder`.
    pub async fn with_components(
        config: ServerConfig,
        source: Arc<dyn MetadataSource>,
        encoder: Arc<dyn Encoder>,
        generator: Arc<dyn SqlGenerator>,
    ) -> ServerResult<Self> {
        let loaded = load_snapshot(source.as_ref()).await?;
        let schema = SchemaIndex::build(loaded.snapshot, encoder.as_ref()).await?;
        Ok(Self::assemble(
            config,
            source,
            encoder,
            generator,
            LoadedSchema {
                schema: Arc::new(schema),
                origin: loaded.origin,
            },
        ))
    }

    fn assemble(
        config: ServerConfig,
        source: Arc<dyn MetadataSource>,
        encoder: Arc<dyn Encoder>,
        generator: Arc<dyn SqlGenerator>,
        loaded: LoadedSchema,
    ) -> Self {
        Self {
            config: Arc::new(config),
            encoder,
            generator,
            source,
            current: RwLock::new(loaded),
            reload_lock: tokio::sync::Mutex::new(()),
            metrics: None,
            started_at: Instant::now(),
        }
    }

    /// Serve `/metrics` from `handle`.
    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn metrics_handle(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }

    /// The schema index serving requests right now.
    pub fn schema(&self) -> Arc<SchemaIndex> {
        self.loaded().schema
    }

    pub fn loaded(&self) -> LoadedSchema {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Re-read metadata and swap in a freshly built index.
    ///
    /// The old index keeps serving until the new one is complete; on error
    /// it stays in place.
    pub async fn reload(&self) -> ServerResult<ReloadSummary> {
        let _guard = self.reload_lock.lock().await;
        let start = Instant::now();

        let loaded = load_snapshot(self.source.as_ref()).await?;
        let schema = SchemaIndex::build(loaded.snapshot, self.encoder.as_ref()).await?;
        let summary = ReloadSummary {
            tables: schema.len(),
            source: loaded.origin,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = LoadedSchema {
            schema: Arc::new(schema),
            origin: loaded.origin,
        };

        tracing::info!(
            tables = summary.tables,
            source = ?summary.source,
            elapsed_ms = summary.elapsed_ms,
            "schema index reloaded"
        );
        Ok(summary)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

