//! HTTP front end for schema-retrieval-augmented text-to-SQL.
//!
//! The server loads table metadata once at startup (live PostgreSQL catalog,
//! or a built-in fallback when no database is configured), embeds every table
//! summary, and answers questions by retrieving the closest tables and
//! prompting a generation backend with only those.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::init_tracing(&config.log_level);
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe, `{"status": "ok"}`
//! - `GET /ready` - Readiness probe, 503 until tables are loaded
//! - `GET /metrics` - Prometheus metrics
//! - `POST /search` - `{query, top_k?}` to ranked `[{table, description, columns, score}]`
//! - `POST /getSql` - same body, plain-text SQL
//! - `GET /debug/metadata` - the loaded snapshot
//! - `POST /debug/reload` - reload metadata and rebuild the index
//!
//! # Environment
//!
//! - `SUPABASE_DB_URL` / `DATABASE_URL` - metadata database (optional)
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` - generation credential (required)
//! - `SCHEMARAG__*` - any [`ServerConfig`] field

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
pub use telemetry::init_tracing;
