//! Tracing setup and the Prometheus-backed pipeline observer.

use generation::GenerationError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use schemarag::{PipelineMetrics, RetrievalError};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install the JSON tracing subscriber. `log_level` is an `EnvFilter`
/// directive; `RUST_LOG` wins when set.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .try_init();
}

/// Install the global Prometheus recorder and hand back its render handle.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// Forwards pipeline stage outcomes to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_retrieval(&self, latency: Duration, result: Result<(), RetrievalError>) {
        let outcome = match &result {
            Ok(()) => "ok",
            Err(RetrievalError::Unavailable) => "unavailable",
            Err(RetrievalError::EmptyQuery) => "bad_request",
            Err(_) => "error",
        };
        metrics::counter!("schemarag_retrievals_total", "outcome" => outcome).increment(1);
        metrics::histogram!("schemarag_retrieval_duration_seconds").record(latency.as_secs_f64());
    }

    fn record_generation(&self, latency: Duration, result: Result<(), GenerationError>) {
        let outcome = match &result {
            Ok(()) => "ok",
            Err(err) if err.is_transient() => "transient_error",
            Err(_) => "error",
        };
        metrics::counter!("schemarag_generations_total", "outcome" => outcome).increment(1);
        metrics::histogram!("schemarag_generation_duration_seconds").record(latency.as_secs_f64());
    }
}
