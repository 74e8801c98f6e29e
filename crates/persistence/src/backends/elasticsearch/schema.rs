//! Index creation.

use elasticsearch::indices::{IndicesCreateParts, IndicesExistsParts};
use serde_json::{Value, json};

use crate::error::{IndexError, IndexResult};

use super::backend::ElasticsearchIndex;

/// Index body applied on creation.
///
/// Strings stay full-text searchable and keep field data so that search
/// results can be sorted by any DTO property.
pub(crate) fn index_body() -> Value {
    json!({
        "mappings": {
            "dynamic_templates": [
                {
                    "strings": {
                        "match_mapping_type": "string",
                        "mapping": {
                            "type": "text",
                            "fielddata": true,
                            "fields": {
                                "keyword": { "type": "keyword", "ignore_above": 256 }
                            }
                        }
                    }
                }
            ]
        }
    })
}

/// Ensures the physical index exists, creating it if necessary.
pub(crate) async fn ensure_index(backend: &ElasticsearchIndex, index: &str) -> IndexResult<()> {
    let name = backend.index_name(index);

    let exists_response = backend
        .client()
        .indices()
        .exists(IndicesExistsParts::Index(&[&name]))
        .send()
        .await?;

    if exists_response.status_code().is_success() {
        return Ok(());
    }

    let response = backend
        .client()
        .indices()
        .create(IndicesCreateParts::Index(&name))
        .body(index_body())
        .send()
        .await?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        // 400 with "resource_already_exists_exception" is OK (race condition)
        if body.contains("resource_already_exists_exception") {
            return Ok(());
        }
        return Err(IndexError::Request {
            backend_name: "elasticsearch".to_string(),
            message: format!("Failed to create index {} (status {}): {}", name, status, body),
        });
    }

    tracing::debug!(index = %name, "Created Elasticsearch index");
    Ok(())
}
