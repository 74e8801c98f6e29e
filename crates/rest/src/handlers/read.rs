//! Read handler.
//!
//! `GET /api/{entities}/{id}`

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

use super::resource::{ApiEntity, parse_id};

/// Handler for reading one record by id.
///
/// Reads go to the relational store, never to the search index.
///
/// # Response
///
/// - `200 OK` - The record
/// - `404 Not Found` - No record has that id
pub async fn read_handler<E: ApiEntity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RestResult<Response> {
    let id = parse_id::<E>(&id)?;
    debug!(entity = E::NAME, id, "Processing read request");

    match E::service(state.services()).find_one(id).await? {
        Some(dto) => Ok(Json(dto).into_response()),
        None => Err(RestError::NotFound {
            entity: E::NAME.to_string(),
            id,
        }),
    }
}
