//! Storefront admin server
//!
//! Serves the catalogue, customer and order records over REST, keeping a
//! search index in step with the relational store.

use std::sync::Arc;

use clap::Parser;
use storefront_persistence::backends::memory::MemoryIndex;
use storefront_persistence::{SearchIndex, Services};
use storefront_rest::{IndexBackendMode, ServerConfig, create_app_with_config, init_logging};
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
use storefront_persistence::backends::sqlite::SqliteBackend;

/// Creates and initializes a SQLite store from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config.database_url.as_str();
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = if db_path == ":memory:" {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::open(db_path)?
    };
    backend.init_schema()?;

    Ok(backend)
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
fn create_services(
    _config: &ServerConfig,
    _index: Arc<dyn SearchIndex>,
) -> anyhow::Result<Services> {
    anyhow::bail!(
        "The relational store requires the 'sqlite' feature. \
         Build with: cargo build -p storefront --features sqlite"
    )
}

#[cfg(feature = "sqlite")]
fn create_services(config: &ServerConfig, index: Arc<dyn SearchIndex>) -> anyhow::Result<Services> {
    let store = create_sqlite_backend(config)?;
    let mirror = Arc::new(storefront_persistence::IndexMirror::new(
        index,
        config.mirror_config(),
    ));
    Ok(Services::new(Arc::new(store), mirror))
}

/// Creates the search index selected by the configuration.
fn create_index(config: &ServerConfig, mode: IndexBackendMode) -> anyhow::Result<Arc<dyn SearchIndex>> {
    match mode {
        IndexBackendMode::Memory => {
            info!("Using in-process search index");
            Ok(Arc::new(MemoryIndex::new()))
        }
        IndexBackendMode::Elasticsearch => create_elasticsearch_index(config),
    }
}

/// Creates the Elasticsearch index client.
#[cfg(feature = "elasticsearch")]
fn create_elasticsearch_index(config: &ServerConfig) -> anyhow::Result<Arc<dyn SearchIndex>> {
    use storefront_persistence::backends::elasticsearch::{
        ElasticsearchAuth, ElasticsearchConfig, ElasticsearchIndex,
    };

    let nodes = config.elasticsearch_node_list();

    let auth = match (
        &config.elasticsearch_username,
        &config.elasticsearch_password,
    ) {
        (Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    let es_config = ElasticsearchConfig {
        nodes: nodes.clone(),
        index_prefix: config.elasticsearch_index_prefix.clone(),
        auth,
        ..Default::default()
    };

    info!(
        nodes = ?nodes,
        index_prefix = %config.elasticsearch_index_prefix,
        "Initializing Elasticsearch index"
    );

    Ok(Arc::new(ElasticsearchIndex::new(es_config)?))
}

/// Fallback when elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
fn create_elasticsearch_index(_config: &ServerConfig) -> anyhow::Result<Arc<dyn SearchIndex>> {
    anyhow::bail!(
        "The Elasticsearch index requires the 'elasticsearch' feature. \
         Build with: cargo build -p storefront --features elasticsearch"
    )
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let index_mode = config
        .index_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid search index configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        search_index = %index_mode,
        "Starting storefront admin server"
    );

    let index = create_index(&config, index_mode)?;
    let services = create_services(&config, index)?;

    // Index failures are logged; the store serves regardless
    if let Err(e) = services.ensure_indexes().await {
        warn!(error = %e, "Could not create search indexes");
    }

    if config.reindex_on_startup() {
        match services.reindex_all().await {
            Ok(written) => {
                let total: u64 = written.iter().map(|(_, n)| n).sum();
                info!(total, "Rebuilt search indexes from the store");
            }
            Err(e) => warn!(error = %e, "Startup reindex failed"),
        }
    }

    let _replay = services.mirror().spawn_replay_task();

    let app = create_app_with_config(services, config.clone());
    serve(app, &config).await
}
