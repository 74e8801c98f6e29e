//! Application state for the storefront REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the entity services and the server configuration.

use std::sync::Arc;

use storefront_persistence::{IndexMirror, Services};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use storefront_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(services, ServerConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct AppState {
    /// One service per entity.
    services: Services,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new AppState with the given services and configuration.
    pub fn new(services: Services, config: ServerConfig) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }

    /// Returns the entity services.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Returns the shared index mirror.
    pub fn mirror(&self) -> &Arc<IndexMirror> {
        self.services.mirror()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Returns the default page size for list and search results.
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    /// Returns the maximum page size for list and search results.
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use storefront_persistence::MirrorConfig;
    use storefront_persistence::backends::memory::MemoryIndex;
    use storefront_persistence::backends::sqlite::SqliteBackend;

    fn services() -> Services {
        let store = SqliteBackend::in_memory().unwrap();
        store.init_schema().unwrap();
        let mirror = Arc::new(IndexMirror::new(
            Arc::new(MemoryIndex::new()),
            MirrorConfig::default(),
        ));
        Services::new(Arc::new(store), mirror)
    }

    #[test]
    fn test_app_state_config_access() {
        let config = ServerConfig {
            base_url: "https://shop.example.com/".to_string(),
            default_page_size: 50,
            max_page_size: 500,
            ..Default::default()
        };
        let state = AppState::new(services(), config);

        assert_eq!(state.base_url(), "https://shop.example.com");
        assert_eq!(state.default_page_size(), 50);
        assert_eq!(state.max_page_size(), 500);
    }

    #[test]
    fn test_app_state_clone_shares_mirror() {
        let state = AppState::new(services(), ServerConfig::default());
        let cloned = state.clone();

        assert!(Arc::ptr_eq(state.mirror(), cloned.mirror()));
    }
}
