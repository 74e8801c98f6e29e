//! # storefront-rest - Storefront Admin REST API
//!
//! This crate exposes the storefront's records (product categories,
//! products, customers, product orders and order items) over a JSON REST
//! API, backed by the dual-write services of `storefront-persistence`.
//!
//! ## Features
//!
//! - **CRUD**: create, update, read and delete for every entity
//! - **Criteria queries**: `<field>.<operator>=<value>` filters with paging,
//!   `X-Total-Count` and RFC 5988 `Link` headers
//! - **Free-text search**: `query_string` searches against the index
//! - **Index maintenance**: mirror status, outbox replay and reindexing
//! - **Problem documents**: every error is RFC 7807 `application/problem+json`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use storefront_persistence::backends::memory::MemoryIndex;
//! use storefront_persistence::backends::sqlite::SqliteBackend;
//! use storefront_persistence::{IndexMirror, MirrorConfig, Services};
//! use storefront_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteBackend::open("storefront.db")?;
//!     store.init_schema()?;
//!
//!     let mirror = Arc::new(IndexMirror::new(
//!         Arc::new(MemoryIndex::new()),
//!         MirrorConfig::default(),
//!     ));
//!     let services = Services::new(Arc::new(store), mirror);
//!
//!     let app = create_app_with_config(services, ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! `{entities}` is one of `product-categories`, `products`, `customers`,
//! `product-orders` or `order-items`.
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | create | POST | `/api/{entities}` |
//! | update | PUT | `/api/{entities}` |
//! | list | GET | `/api/{entities}?criteria` |
//! | count | GET | `/api/{entities}/count?criteria` |
//! | read | GET | `/api/{entities}/{id}` |
//! | delete | DELETE | `/api/{entities}/{id}` |
//! | search | GET | `/api/_search/{entities}?query=` |
//! | health | GET | `/management/health` |
//! | mirror status | GET | `/management/index` |
//! | replay | POST | `/management/index/replay` |
//! | reindex | POST | `/management/index/reindex` |
//!
//! ## Error Handling
//!
//! | HTTP Status | errorKey | Description |
//! |-------------|----------|-------------|
//! | 400 | validation, invalidreference, idexists, idnull, badcriteria, badquery | Bad request |
//! | 404 | notfound | Record not found |
//! | 409 | inuse | Record still referenced |
//! | 415 | unsupportedmediatype | Body is not JSON |
//! | 500 | internal | Store failure |
//! | 503 | indexunavailable | Search index failure |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and problem documents
//! - [`config`] - Server configuration
//! - [`state`] - Application state (services, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Axum extractors for paging, criteria and bodies
//! - [`responses`] - Alert and pagination headers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{IndexBackendMode, ServerConfig};
pub use error::{RestError, RestResult};
pub use state::AppState;

use axum::Router;
use storefront_persistence::Services;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app(services: Services) -> Router {
    create_app_with_config(services, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// This function sets up every route with tracing, the request timeout and,
/// if enabled, CORS.
///
/// # Arguments
///
/// * `services` - The entity services
/// * `config` - Server configuration
pub fn create_app_with_config(services: Services, config: ServerConfig) -> Router {
    info!(
        store = %services.store_kind(),
        index = %services.mirror().index().backend_kind(),
        "Creating REST API server"
    );

    // Create application state
    let state = AppState::new(services, config.clone());

    // Build the router with all routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    // The admin frontend reads these from cross-origin responses
    cors.expose_headers([
        responses::headers::ALERT_HEADER,
        responses::headers::PARAMS_HEADER,
        responses::pagination::TOTAL_COUNT_HEADER,
        axum::http::header::LINK,
        axum::http::header::LOCATION,
    ])
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// the default filter.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "storefront_rest={level},storefront_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_builds_from_lists() {
        let config = ServerConfig {
            cors_origins: "http://localhost:9000,https://admin.example.com".to_string(),
            ..Default::default()
        };
        let _ = build_cors_layer(&config);
    }
}
