//! In-process search index.
//!
//! [`MemoryIndex`] keeps every document in a map keyed by index name and id
//! and evaluates a query-string subset (see [`query`]) by scanning. It backs
//! development servers and tests; its contents are lost on restart and are
//! rebuilt by reindexing from the relational store.

pub mod query;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::core::{BackendKind, IndexHits, SearchIndex};
use crate::error::IndexResult;
use crate::types::{Direction, PageRequest, SortOrder};

/// A search index held in process memory.
#[derive(Default)]
pub struct MemoryIndex {
    indexes: RwLock<HashMap<String, BTreeMap<i64, Value>>>,
}

impl Debug for MemoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let indexes = self.indexes.read();
        f.debug_struct("MemoryIndex")
            .field("indexes", &indexes.len())
            .field(
                "documents",
                &indexes.values().map(BTreeMap::len).sum::<usize>(),
            )
            .finish()
    }
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in an index.
    pub fn len(&self, index: &str) -> usize {
        self.indexes.read().get(index).map_or(0, BTreeMap::len)
    }

    /// Returns true if the index holds no documents.
    pub fn is_empty(&self, index: &str) -> bool {
        self.len(index) == 0
    }

    /// Returns a stored document.
    pub fn document(&self, index: &str, id: i64) -> Option<Value> {
        self.indexes
            .read()
            .get(index)
            .and_then(|docs| docs.get(&id).cloned())
    }
}

fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        // nulls and missing values sort last
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn sort_documents(documents: &mut [Value], sort: &[SortOrder]) {
    documents.sort_by(|a, b| {
        for order in sort {
            let ordering = compare_json(a.get(&order.property), b.get(&order.property));
            let ordering = match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn ensure_index(&self, index: &str) -> IndexResult<()> {
        self.indexes.write().entry(index.to_string()).or_default();
        Ok(())
    }

    async fn upsert(&self, index: &str, id: i64, document: Value) -> IndexResult<()> {
        self.indexes
            .write()
            .entry(index.to_string())
            .or_default()
            .insert(id, document);
        Ok(())
    }

    async fn delete(&self, index: &str, id: i64) -> IndexResult<()> {
        if let Some(docs) = self.indexes.write().get_mut(index) {
            docs.remove(&id);
        }
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        query: &str,
        page: &PageRequest,
    ) -> IndexResult<IndexHits> {
        let parsed = query::parse(query)?;

        // Documents iterate in id order, which is the order without sort keys.
        let mut matched: Vec<Value> = self
            .indexes
            .read()
            .get(index)
            .map(|docs| {
                docs.values()
                    .filter(|doc| parsed.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        sort_documents(&mut matched, &page.sort);

        let total = matched.len() as u64;
        let documents = matched
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size as usize)
            .collect();

        Ok(IndexHits { total, documents })
    }

    async fn clear(&self, index: &str) -> IndexResult<()> {
        self.indexes.write().remove(index);
        Ok(())
    }

    async fn refresh(&self, _index: &str) -> IndexResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> IndexResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use serde_json::json;

    async fn seeded() -> MemoryIndex {
        let index = MemoryIndex::new();
        for (id, name, price) in [(1, "Red Shirt", 20), (2, "Blue Shirt", 10), (3, "Hat", 5)] {
            index
                .upsert("product", id, json!({"id": id, "name": name, "price": price}))
                .await
                .unwrap();
        }
        index
    }

    #[tokio::test]
    async fn test_search_by_id() {
        let index = seeded().await;
        let hits = index
            .search("product", "id:2", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.documents[0]["name"], "Blue Shirt");

        let hits = index
            .search("product", "id:99", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits, IndexHits::default());
    }

    #[tokio::test]
    async fn test_search_paginates_and_sorts() {
        let index = seeded().await;
        let request = PageRequest::new(0, 1).with_sort("price", Direction::Desc);
        let hits = index.search("product", "shirt", &request).await.unwrap();
        assert_eq!(hits.total, 2);
        assert_eq!(hits.documents.len(), 1);
        assert_eq!(hits.documents[0]["id"], 1);

        let second = index
            .search("product", "shirt", &PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(second.documents[0]["id"], 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_delete_removes() {
        let index = seeded().await;
        index
            .upsert("product", 3, json!({"id": 3, "name": "Cap"}))
            .await
            .unwrap();
        assert_eq!(index.document("product", 3).unwrap()["name"], "Cap");
        assert_eq!(index.len("product"), 3);

        index.delete("product", 3).await.unwrap();
        index.delete("product", 3).await.unwrap();
        assert!(index.document("product", 3).is_none());
        assert_eq!(index.len("product"), 2);
    }

    #[tokio::test]
    async fn test_unknown_index_is_empty() {
        let index = MemoryIndex::new();
        let hits = index
            .search("nothing", "*", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total, 0);
        assert!(index.is_empty("nothing"));
    }

    #[tokio::test]
    async fn test_bad_query_is_rejected() {
        let index = seeded().await;
        let err = index
            .search("product", "name:(", &PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::QueryParse { .. }));
    }
}
