//! Server configuration for the storefront REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STOREFRONT_PORT` | 8080 | Server port |
//! | `STOREFRONT_HOST` | 127.0.0.1 | Host to bind |
//! | `STOREFRONT_LOG_LEVEL` | info | Log level |
//! | `STOREFRONT_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `STOREFRONT_ENABLE_CORS` | true | Enable CORS |
//! | `STOREFRONT_CORS_ORIGINS` | * | Allowed origins |
//! | `STOREFRONT_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `STOREFRONT_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `STOREFRONT_BASE_URL` | http://localhost:8080 | Server base URL |
//! | `STOREFRONT_DEFAULT_PAGE_SIZE` | 20 | Page size when `size` is absent |
//! | `STOREFRONT_MAX_PAGE_SIZE` | 1000 | Largest accepted `size` |
//! | `STOREFRONT_DATABASE_URL` | storefront.db | SQLite path or `:memory:` |
//! | `STOREFRONT_INDEX_BACKEND` | memory | `memory` or `elasticsearch` |
//! | `STOREFRONT_ELASTICSEARCH_NODES` | http://localhost:9200 | Comma-separated node URLs |
//! | `STOREFRONT_ELASTICSEARCH_USERNAME` | | Basic auth user |
//! | `STOREFRONT_ELASTICSEARCH_PASSWORD` | | Basic auth password |
//! | `STOREFRONT_ELASTICSEARCH_INDEX_PREFIX` | storefront | Index name prefix |
//! | `STOREFRONT_MIRROR_RETRIES` | 0 | Inline index write retries |
//! | `STOREFRONT_MIRROR_REPLAY_INTERVAL` | 0 | Outbox replay period (seconds, 0 = off) |
//! | `STOREFRONT_REINDEX_ON_STARTUP` | memory index only | Rebuild indexes at boot |
//!
//! # Example
//!
//! ```rust
//! use storefront_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use storefront_persistence::mirror::{MirrorConfig, RetryConfig};

/// Which search index the server mirrors records into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBackendMode {
    /// In-process index, rebuilt from the database at startup.
    #[default]
    Memory,
    /// Elasticsearch cluster.
    Elasticsearch,
}

impl fmt::Display for IndexBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexBackendMode::Memory => f.write_str("memory"),
            IndexBackendMode::Elasticsearch => f.write_str("elasticsearch"),
        }
    }
}

impl FromStr for IndexBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(IndexBackendMode::Memory),
            "elasticsearch" | "es" => Ok(IndexBackendMode::Elasticsearch),
            other => Err(format!(
                "unknown index backend '{}' (expected memory or elasticsearch)",
                other
            )),
        }
    }
}

/// Server configuration for the storefront REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront admin backend")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "STOREFRONT_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "STOREFRONT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "STOREFRONT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "STOREFRONT_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "STOREFRONT_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "STOREFRONT_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "STOREFRONT_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "STOREFRONT_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used in Location and Link headers).
    #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Default page size for list and search results.
    #[arg(long, env = "STOREFRONT_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u32,

    /// Maximum page size for list and search results.
    #[arg(long, env = "STOREFRONT_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: u32,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "STOREFRONT_DATABASE_URL", default_value = "storefront.db")]
    pub database_url: String,

    /// Search index backend (memory, elasticsearch).
    #[arg(long, env = "STOREFRONT_INDEX_BACKEND", default_value = "memory")]
    pub index_backend: String,

    /// Elasticsearch node URLs (comma-separated).
    #[arg(
        long,
        env = "STOREFRONT_ELASTICSEARCH_NODES",
        default_value = "http://localhost:9200"
    )]
    pub elasticsearch_nodes: String,

    /// Elasticsearch username for basic auth.
    #[arg(long, env = "STOREFRONT_ELASTICSEARCH_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch password for basic auth.
    #[arg(long, env = "STOREFRONT_ELASTICSEARCH_PASSWORD")]
    pub elasticsearch_password: Option<String>,

    /// Elasticsearch index name prefix.
    #[arg(
        long,
        env = "STOREFRONT_ELASTICSEARCH_INDEX_PREFIX",
        default_value = "storefront"
    )]
    pub elasticsearch_index_prefix: String,

    /// Inline retries for a failed index write before it is deferred.
    #[arg(long, env = "STOREFRONT_MIRROR_RETRIES", default_value = "0")]
    pub mirror_retries: u32,

    /// Seconds between background outbox replays; 0 disables the task.
    #[arg(long, env = "STOREFRONT_MIRROR_REPLAY_INTERVAL", default_value = "0")]
    pub mirror_replay_interval: u64,

    /// Rebuild every index from the database at startup.
    ///
    /// Defaults to true for the memory index and false otherwise.
    #[arg(long, env = "STOREFRONT_REINDEX_ON_STARTUP")]
    pub reindex_on_startup: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            base_url: "http://localhost:8080".to_string(),
            default_page_size: 20,
            max_page_size: 1000,
            database_url: "storefront.db".to_string(),
            index_backend: "memory".to_string(),
            elasticsearch_nodes: "http://localhost:9200".to_string(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            elasticsearch_index_prefix: "storefront".to_string(),
            mirror_retries: 0,
            mirror_replay_interval: 0,
            reindex_on_startup: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Parses the configured index backend.
    pub fn index_backend_mode(&self) -> Result<IndexBackendMode, String> {
        self.index_backend.parse()
    }

    /// Returns the Elasticsearch node URLs.
    pub fn elasticsearch_node_list(&self) -> Vec<String> {
        self.elasticsearch_nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Whether to rebuild the indexes at startup.
    pub fn reindex_on_startup(&self) -> bool {
        self.reindex_on_startup.unwrap_or_else(|| {
            matches!(self.index_backend_mode(), Ok(IndexBackendMode::Memory))
        })
    }

    /// Builds the mirror configuration.
    pub fn mirror_config(&self) -> MirrorConfig {
        MirrorConfig {
            retry: RetryConfig {
                max_retries: self.mirror_retries,
                ..Default::default()
            },
            replay_interval: Duration::from_secs(self.mirror_replay_interval),
            ..Default::default()
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            errors.push(format!("Base URL '{}' is not a valid URL", self.base_url));
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        match self.index_backend_mode() {
            Ok(IndexBackendMode::Elasticsearch) => {
                if self.elasticsearch_node_list().is_empty() {
                    errors.push("Elasticsearch index requires at least one node".to_string());
                }
                if self.elasticsearch_username.is_some() != self.elasticsearch_password.is_some() {
                    errors.push(
                        "Elasticsearch username and password must be set together".to_string(),
                    );
                }
            }
            Ok(IndexBackendMode::Memory) => {}
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, an in-memory database and the memory index.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost".to_string(),
            default_page_size: 20,
            max_page_size: 100,
            database_url: ":memory:".to_string(),
            index_backend: "memory".to_string(),
            reindex_on_startup: Some(false),
            ..Default::default()
        }
    }
}
