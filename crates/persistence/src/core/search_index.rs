//! The search index facade.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::IndexResult;
use crate::types::PageRequest;

use super::BackendKind;

/// Documents matching a free-text query, plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexHits {
    /// Total number of matching documents across all pages.
    pub total: u64,
    /// The documents of the requested page, as stored.
    pub documents: Vec<Value>,
}

/// A free-text index holding one JSON document per record id.
///
/// Indexes are addressed by the entity's index name. An index that was never
/// written to behaves as empty.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Returns the kind of index backend.
    fn backend_kind(&self) -> BackendKind;

    /// Creates the index if it does not exist.
    async fn ensure_index(&self, index: &str) -> IndexResult<()>;

    /// Inserts or replaces the document with the given id.
    async fn upsert(&self, index: &str, id: i64, document: Value) -> IndexResult<()>;

    /// Removes the document with the given id. Removing an absent id succeeds.
    async fn delete(&self, index: &str, id: i64) -> IndexResult<()>;

    /// Runs a query-string expression and returns one page of documents.
    ///
    /// # Errors
    ///
    /// * `IndexError::QueryParse` - If the expression is malformed
    /// * `IndexError::Unavailable` - If the index cannot be reached
    async fn search(&self, index: &str, query: &str, page: &PageRequest)
    -> IndexResult<IndexHits>;

    /// Removes every document from the index.
    async fn clear(&self, index: &str) -> IndexResult<()>;

    /// Makes recent writes visible to searches.
    async fn refresh(&self, index: &str) -> IndexResult<()>;

    /// Checks that the index backend is reachable.
    async fn health_check(&self) -> IndexResult<()>;
}
