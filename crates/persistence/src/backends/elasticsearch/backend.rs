//! Elasticsearch client construction and configuration.

use std::fmt::Debug;
use std::time::Duration;

use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for the Elasticsearch index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Index name prefix (default: `"storefront"`).
    /// Indices are named: `{prefix}_{entity}`
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Wait for each write to become searchable before returning (default: false).
    #[serde(default)]
    pub refresh_on_write: bool,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_index_prefix() -> String {
    "storefront".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index_prefix: default_index_prefix(),
            request_timeout_ms: default_request_timeout_ms(),
            refresh_on_write: false,
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// Search index backed by an Elasticsearch cluster.
pub struct ElasticsearchIndex {
    client: Elasticsearch,
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchIndex")
            .field("nodes", &self.config.nodes)
            .field("index_prefix", &self.config.index_prefix)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchIndex {
    /// Creates a client for the configured cluster. No request is sent.
    pub fn new(config: ElasticsearchConfig) -> IndexResult<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &ElasticsearchConfig) -> IndexResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url =
            url.parse().map_err(|e| IndexError::Unavailable {
                backend_name: "elasticsearch".to_string(),
                message: format!("Invalid URL '{}': {}", url, e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| IndexError::Unavailable {
            backend_name: "elasticsearch".to_string(),
            message: format!("Failed to build transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the Elasticsearch client.
    pub(crate) fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the index configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Returns the physical index name for an entity index.
    pub fn index_name(&self, index: &str) -> String {
        format!("{}_{}", self.config.index_prefix, index.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ElasticsearchConfig::default();
        assert_eq!(config.index_prefix, "storefront");
        assert_eq!(config.request_timeout_ms, 30000);
        assert_eq!(config.nodes, vec!["http://localhost:9200"]);
        assert!(!config.refresh_on_write);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ElasticsearchConfig =
            serde_json::from_str(r#"{"nodes": ["http://es:9200"]}"#).unwrap();
        assert_eq!(config.index_prefix, "storefront");
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_index_name() {
        let index = ElasticsearchIndex::new(ElasticsearchConfig::default()).unwrap();
        assert_eq!(index.index_name("orderitem"), "storefront_orderitem");
        assert_eq!(index.index_name("Product"), "storefront_product");
    }

    #[test]
    fn test_invalid_node_url() {
        let config = ElasticsearchConfig {
            nodes: vec!["not a url".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            ElasticsearchIndex::new(config),
            Err(IndexError::Unavailable { .. })
        ));
    }
}
