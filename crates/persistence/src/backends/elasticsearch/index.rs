//! [`SearchIndex`] implementation for Elasticsearch.

use async_trait::async_trait;
use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::http::response::Response;
use elasticsearch::indices::{IndicesDeleteParts, IndicesRefreshParts};
use elasticsearch::params::Refresh;
use elasticsearch::{DeleteParts, IndexParts, SearchParts};
use serde_json::{Value, json};

use crate::core::{BackendKind, IndexHits, SearchIndex};
use crate::error::{IndexError, IndexResult};
use crate::types::PageRequest;

use super::backend::ElasticsearchIndex;
use super::schema;

fn request_error(message: String) -> IndexError {
    IndexError::Request {
        backend_name: "elasticsearch".to_string(),
        message,
    }
}

/// Builds a `query_string` search body for one page.
pub(crate) fn search_body(query: &str, page: &PageRequest) -> Value {
    let query = if query.trim().is_empty() { "*" } else { query };

    let mut sort: Vec<Value> = page
        .sort
        .iter()
        .map(|order| {
            json!({
                order.property.as_str(): {
                    "order": order.direction.as_sql().to_lowercase(),
                    "missing": "_last",
                    "unmapped_type": "keyword"
                }
            })
        })
        .collect();
    if !sort.is_empty() {
        sort.push(json!({ "id": { "order": "asc", "unmapped_type": "long" } }));
    }

    let mut body = json!({
        "from": page.offset(),
        "size": page.size,
        "track_total_hits": true,
        "query": {
            "query_string": {
                "query": query,
                "default_operator": "AND"
            }
        }
    });
    if !sort.is_empty() {
        body["sort"] = Value::Array(sort);
    }
    body
}

/// Extracts `_source` documents and the total from a search response body.
pub(crate) fn parse_hits(body: &Value) -> IndexHits {
    let documents = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let total = body
        .pointer("/hits/total/value")
        .and_then(Value::as_u64)
        .unwrap_or(documents.len() as u64);

    IndexHits { total, documents }
}

/// Reads a failed response body; a missing index is reported as `None`.
async fn failure_body(response: Response) -> Option<String> {
    let body = response.text().await.unwrap_or_default();
    if body.contains("index_not_found_exception") {
        None
    } else {
        Some(body)
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
    }

    async fn ensure_index(&self, index: &str) -> IndexResult<()> {
        schema::ensure_index(self, index).await
    }

    async fn upsert(&self, index: &str, id: i64, document: Value) -> IndexResult<()> {
        let name = self.index_name(index);
        let doc_id = id.to_string();
        let refresh = if self.config().refresh_on_write {
            Refresh::WaitFor
        } else {
            Refresh::False
        };

        let response = self
            .client()
            .index(IndexParts::IndexId(&name, &doc_id))
            .refresh(refresh)
            .body(document)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(request_error(format!(
                "Failed to index document {} (status {}): {}",
                doc_id, status, body
            )));
        }
        Ok(())
    }

    async fn delete(&self, index: &str, id: i64) -> IndexResult<()> {
        let name = self.index_name(index);
        let doc_id = id.to_string();

        let response = self
            .client()
            .delete(DeleteParts::IndexId(&name, &doc_id))
            .send()
            .await?;

        let status = response.status_code();
        // 404 means the document (or index) is already gone
        if !status.is_success() && status.as_u16() != 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(request_error(format!(
                "Failed to delete document {} (status {}): {}",
                doc_id, status, body
            )));
        }
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        query: &str,
        page: &PageRequest,
    ) -> IndexResult<IndexHits> {
        let name = self.index_name(index);

        let response = self
            .client()
            .search(SearchParts::Index(&[&name]))
            .body(search_body(query, page))
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            return match failure_body(response).await {
                None => Ok(IndexHits::default()),
                Some(body) if status.as_u16() == 400 => Err(IndexError::QueryParse {
                    query: query.to_string(),
                    message: body,
                }),
                Some(body) => Err(request_error(format!("Search failed: {}", body))),
            };
        }

        let body: Value = response.json().await?;
        Ok(parse_hits(&body))
    }

    async fn clear(&self, index: &str) -> IndexResult<()> {
        let name = self.index_name(index);
        let response = self
            .client()
            .indices()
            .delete(IndicesDeleteParts::Index(&[&name]))
            .send()
            .await?;

        if !response.status_code().is_success() {
            if let Some(body) = failure_body(response).await {
                return Err(request_error(format!(
                    "Failed to delete index {}: {}",
                    name, body
                )));
            }
        }

        tracing::debug!(index = %name, "Cleared Elasticsearch index");
        schema::ensure_index(self, index).await
    }

    async fn refresh(&self, index: &str) -> IndexResult<()> {
        let name = self.index_name(index);
        let response = self
            .client()
            .indices()
            .refresh(IndicesRefreshParts::Index(&[&name]))
            .send()
            .await?;

        if !response.status_code().is_success() {
            if let Some(body) = failure_body(response).await {
                return Err(request_error(format!(
                    "Failed to refresh index {}: {}",
                    name, body
                )));
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> IndexResult<()> {
        let response = self
            .client()
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(IndexError::Unavailable {
                backend_name: "elasticsearch".to_string(),
                message: format!("Cluster health returned status {}", status),
            });
        }

        let body: Value = response.json().await?;
        let cluster_status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if cluster_status == "red" {
            return Err(IndexError::Unavailable {
                backend_name: "elasticsearch".to_string(),
                message: "Cluster status is red".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_search_body_paging() {
        let body = search_body("id:5", &PageRequest::new(3, 10));
        assert_eq!(body["from"], 30);
        assert_eq!(body["size"], 10);
        assert_eq!(body["query"]["query_string"]["query"], "id:5");
        assert_eq!(body["query"]["query_string"]["default_operator"], "AND");
        assert!(body.get("sort").is_none());
    }

    #[test]
    fn test_search_body_sort_with_tie_break() {
        let request = PageRequest::new(0, 20).with_sort("placedDate", Direction::Desc);
        let body = search_body("", &request);
        assert_eq!(body["query"]["query_string"]["query"], "*");
        assert_eq!(body["sort"][0]["placedDate"]["order"], "desc");
        assert_eq!(body["sort"][1]["id"]["order"], "asc");
    }

    #[test]
    fn test_parse_hits() {
        let body = json!({
            "hits": {
                "total": { "value": 12, "relation": "eq" },
                "hits": [
                    { "_id": "1", "_source": { "id": 1, "name": "Hat" } },
                    { "_id": "2", "_source": { "id": 2, "name": "Cap" } }
                ]
            }
        });
        let hits = parse_hits(&body);
        assert_eq!(hits.total, 12);
        assert_eq!(hits.documents.len(), 2);
        assert_eq!(hits.documents[1]["name"], "Cap");
    }

    #[test]
    fn test_parse_hits_without_hits() {
        assert_eq!(parse_hits(&json!({})), IndexHits::default());
    }
}
