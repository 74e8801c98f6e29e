//! Free-text search query extractor.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::RestError;

use super::query_pairs;

/// The required `query` parameter of a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(pub String);

impl SearchQuery {
    /// Returns the query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        query_pairs(parts)
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| SearchQuery(value))
            .ok_or_else(|| RestError::BadRequest {
                message: "Required request parameter 'query' is not present".to_string(),
            })
    }
}
