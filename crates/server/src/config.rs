use catalog::CatalogConfig;
use generation::GenerationConfig;
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
///
/// Read from an optional `schemarag.toml` and then from `SCHEMARAG__*`
/// environment variables (`__` separates nested keys, so
/// `SCHEMARAG__SEMANTIC__MODE=api` sets `semantic.mode`). Credentials are
/// never read from either source; see [`ServerConfig::with_env_credentials`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// `top_k` used when a request omits it
    #[serde(default = "default_top_k")]
    pub default_top_k: i64,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            default_top_k: default_top_k(),
            semantic: SemanticConfig::default(),
            generation: GenerationConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the config file, environment variables and
    /// credential variables.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("schemarag").required(false))
            .add_source(
                config::Environment::with_prefix("SCHEMARAG")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("catalog.excluded_schemas"),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        let config = config.with_env_credentials();
        config.validate()?;
        Ok(config)
    }

    /// Pull secrets and endpoint overrides from their dedicated variables:
    /// the database URL, the generation API key and the embedding API
    /// settings.
    pub fn with_env_credentials(mut self) -> Self {
        self.semantic = self.semantic.with_env_overrides();
        self.generation = self.generation.with_env_overrides();
        self.catalog = self.catalog.with_env_overrides();
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }
        if self.max_body_size_mb == 0 {
            anyhow::bail!("max_body_size_mb must be greater than 0");
        }
        if self.semantic.dimension == 0 {
            anyhow::bail!("semantic.dimension must be greater than 0");
        }
        self.generation.validate()?;
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_top_k() -> i64 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size_mb, 1);
        assert_eq!(cfg.default_top_k, 2);
        assert!(cfg.enable_cors);
        assert_eq!(cfg.semantic.mode, "hashed");
        assert_eq!(cfg.generation.model, "gemini-2.5-flash");
        assert_eq!(cfg.catalog.default_schema, "public");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn nested_sections_default_when_missing() {
        let cfg: ServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.semantic.dimension, 384);
        assert_eq!(cfg.generation.max_retries, 1);
    }

    #[test]
    fn credentials_in_files_are_ignored() {
        let cfg: ServerConfig = serde_json::from_str(
            r#"{"generation": {"api_key": "from-file"}, "catalog": {"database_url": "postgres://x"}}"#,
        )
        .unwrap();
        assert!(cfg.generation.api_key.is_none());
        assert!(cfg.catalog.database_url.is_none());
    }

    #[test]
    fn serialized_config_has_no_secrets() {
        let mut cfg = ServerConfig::default();
        cfg.generation.api_key = Some("AIza-secret".into());
        cfg.catalog.database_url = Some("postgres://u:hunter2@h/db".into());
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("AIza-secret"));
        assert!(!json.contains("hunter2"));
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = ServerConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
