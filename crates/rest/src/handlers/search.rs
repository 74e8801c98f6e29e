//! List, count and free-text search handlers.
//!
//! - `GET /api/{entities}` - criteria query, paged
//! - `GET /api/{entities}/count` - criteria count
//! - `GET /api/_search/{entities}?query=` - index query, paged

use axum::{
    Json,
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{CriteriaQuery, Pagination, SearchQuery};
use crate::responses::pagination_headers;
use crate::state::AppState;

use super::resource::ApiEntity;

/// Handler for listing records matching criteria.
///
/// # Query Parameters
///
/// - `<field>.<operator>=<value>` - filters, ANDed together
/// - `page`, `size`, `sort=<property>,<asc|desc>` - paging
///
/// # Response
///
/// - `200 OK` - JSON array with `X-Total-Count` and `Link` headers
/// - `400 Bad Request` - Malformed filter or paging parameters (`badcriteria`)
pub async fn list_handler<E: ApiEntity>(
    State(state): State<AppState>,
    uri: Uri,
    CriteriaQuery(criteria): CriteriaQuery<E::Criteria>,
    Pagination(page_request): Pagination,
) -> RestResult<Response> {
    debug!(
        entity = E::NAME,
        criteria = ?criteria,
        page = page_request.page,
        size = page_request.size,
        "Processing list request"
    );

    let page = E::service(state.services())
        .find_by_criteria(&criteria, &page_request)
        .await?;

    let headers = pagination_headers(state.base_url(), &uri, &page);
    Ok((headers, Json(page.content)).into_response())
}

/// Handler for counting records matching criteria.
///
/// # Response
///
/// - `200 OK` - The count as a bare JSON number
pub async fn count_handler<E: ApiEntity>(
    State(state): State<AppState>,
    CriteriaQuery(criteria): CriteriaQuery<E::Criteria>,
) -> RestResult<Response> {
    debug!(entity = E::NAME, criteria = ?criteria, "Processing count request");

    let count = E::service(state.services())
        .count_by_criteria(&criteria)
        .await?;

    Ok(Json(count).into_response())
}

/// Handler for free-text search against the index.
///
/// # Response
///
/// - `200 OK` - JSON array with `X-Total-Count` and `Link` headers
/// - `400 Bad Request` - Missing or malformed `query` (`badquery`)
/// - `503 Service Unavailable` - The index cannot be reached
pub async fn search_handler<E: ApiEntity>(
    State(state): State<AppState>,
    uri: Uri,
    query: SearchQuery,
    Pagination(page_request): Pagination,
) -> RestResult<Response> {
    debug!(
        entity = E::NAME,
        query = query.as_str(),
        page = page_request.page,
        "Processing search request"
    );

    let page = E::service(state.services())
        .search(query.as_str(), &page_request)
        .await?;

    let headers = pagination_headers(state.base_url(), &uri, &page);
    Ok((headers, Json(page.content)).into_response())
}
