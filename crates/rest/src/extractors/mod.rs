//! Axum extractors for storefront requests.
//!
//! - [`Pagination`] - `page`, `size` and `sort` parameters
//! - [`CriteriaQuery`] - per-field filter parameters
//! - [`SearchQuery`] - the free-text `query` parameter
//! - [`JsonBody`] - a JSON request body
//!
//! All of them reject with [`RestError`](crate::RestError), so malformed
//! requests get the same problem document as any other error.

mod criteria;
mod json_body;
mod pagination;
mod search_query;

use axum::http::request::Parts;

pub use criteria::{CriteriaQuery, RESERVED_PARAMETERS};
pub use json_body::{JsonBody, is_json_content_type};
pub use pagination::Pagination;
pub use search_query::SearchQuery;

/// Decodes the query string into ordered pairs, keeping repeated keys.
pub(crate) fn query_pairs(parts: &Parts) -> Vec<(String, String)> {
    parts
        .uri
        .query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
