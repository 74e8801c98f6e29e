//! Delete handler.
//!
//! `DELETE /api/{entities}/{id}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::responses::{AlertAction, ResourceHeaders};
use crate::state::AppState;

use super::resource::{ApiEntity, parse_id};

/// Handler for deleting a record.
///
/// The row is removed first, then the index entry.
///
/// # Response
///
/// - `204 No Content` - Record deleted, with alert headers
/// - `404 Not Found` - No record has that id
/// - `409 Conflict` - Other records still reference it
pub async fn delete_handler<E: ApiEntity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> RestResult<Response> {
    let id = parse_id::<E>(&id)?;
    debug!(entity = E::NAME, id, "Processing delete request");

    E::service(state.services()).delete(id).await?;

    debug!(entity = E::NAME, id, "Record deleted");

    let headers = ResourceHeaders::alert(AlertAction::Deleted, &E::alert_name(), id);
    Ok((StatusCode::NO_CONTENT, headers.to_header_map()).into_response())
}
