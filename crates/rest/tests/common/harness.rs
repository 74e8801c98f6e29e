//! REST API test harness.
//!
//! Builds the full application (routes plus middleware) over an in-memory
//! SQLite store and a [`FailingIndex`] that tests can switch off to simulate
//! an unreachable search index.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use storefront_persistence::backends::memory::MemoryIndex;
use storefront_persistence::backends::sqlite::SqliteBackend;
use storefront_persistence::core::{BackendKind, IndexHits, SearchIndex};
use storefront_persistence::error::{IndexError, IndexResult};
use storefront_persistence::types::PageRequest;
use storefront_persistence::{IndexMirror, MirrorConfig, Services};
use storefront_rest::{ServerConfig, create_app_with_config};

/// A memory index whose operations fail while it is switched off.
#[derive(Debug, Default)]
pub struct FailingIndex {
    pub inner: MemoryIndex,
    failing: AtomicBool,
}

impl FailingIndex {
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    fn check(&self) -> IndexResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable {
                backend_name: "failing".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for FailingIndex {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Custom("failing")
    }

    async fn ensure_index(&self, index: &str) -> IndexResult<()> {
        self.check()?;
        self.inner.ensure_index(index).await
    }

    async fn upsert(&self, index: &str, id: i64, document: Value) -> IndexResult<()> {
        self.check()?;
        self.inner.upsert(index, id, document).await
    }

    async fn delete(&self, index: &str, id: i64) -> IndexResult<()> {
        self.check()?;
        self.inner.delete(index, id).await
    }

    async fn search(&self, index: &str, query: &str, page: &PageRequest) -> IndexResult<IndexHits> {
        self.check()?;
        self.inner.search(index, query, page).await
    }

    async fn clear(&self, index: &str) -> IndexResult<()> {
        self.check()?;
        self.inner.clear(index).await
    }

    async fn refresh(&self, index: &str) -> IndexResult<()> {
        self.check()?;
        self.inner.refresh(index).await
    }

    async fn health_check(&self) -> IndexResult<()> {
        self.check()
    }
}

/// A running test server plus handles on its backends.
pub struct TestApp {
    /// The test server instance.
    pub server: TestServer,
    /// The services behind the server.
    pub services: Services,
    /// The search index, for switching it off and inspecting documents.
    pub index: Arc<FailingIndex>,
}

impl TestApp {
    /// Creates a server with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a server with the given configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let store = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        store.init_schema().expect("Failed to initialize schema");

        let index = Arc::new(FailingIndex::default());
        let mirror = Arc::new(IndexMirror::new(index.clone(), MirrorConfig::default()));
        let services = Services::new(Arc::new(store), mirror);

        let app = create_app_with_config(services.clone(), config);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            services,
            index,
        }
    }

    /// POSTs a body and returns the created record, asserting 201.
    pub async fn create(&self, path: &str, body: Value) -> Value {
        let response = self.server.post(path).json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Returns the id of a created record.
    pub async fn create_id(&self, path: &str, body: Value) -> i64 {
        self.create(path, body)
            .await
            .get("id")
            .and_then(Value::as_i64)
            .expect("created record has an id")
    }

    /// GETs a count endpoint.
    pub async fn count(&self, path: &str) -> u64 {
        let response = self.server.get(&format!("{}/count", path)).await;
        response.assert_status_ok();
        response.json::<u64>()
    }
}

/// Returns a header as a string, panicking if absent.
pub fn header(response: &axum_test::TestResponse, name: &str) -> String {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {}", name))
        .to_str()
        .expect("header is ASCII")
        .to_string()
}
