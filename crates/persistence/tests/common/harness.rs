//! Backend and service setup.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use storefront_persistence::backends::memory::MemoryIndex;
use storefront_persistence::backends::sqlite::SqliteBackend;
use storefront_persistence::core::{BackendKind, IndexHits, SearchIndex};
use storefront_persistence::error::{IndexError, IndexResult};
use storefront_persistence::mirror::{IndexMirror, MirrorConfig};
use storefront_persistence::service::Services;
use storefront_persistence::types::PageRequest;

/// A memory index whose operations fail while it is switched off.
#[derive(Debug, Default)]
pub struct FailingIndex {
    pub inner: MemoryIndex,
    failing: AtomicBool,
}

impl FailingIndex {
    pub fn new() -> Self {
        Self::default()
    }

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
                message: "index switched off".to_string(),
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

pub fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

/// Services over an in-memory store and a [`FailingIndex`].
pub fn create_services() -> (Services, Arc<FailingIndex>) {
    let index = Arc::new(FailingIndex::new());
    let mirror = Arc::new(IndexMirror::new(index.clone(), MirrorConfig::default()));
    (Services::new(Arc::new(create_backend()), mirror), index)
}
