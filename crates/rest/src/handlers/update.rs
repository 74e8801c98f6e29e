//! Update handler.
//!
//! `PUT /api/{entities}`

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storefront_persistence::types::Dto;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::JsonBody;
use crate::responses::{AlertAction, ResourceHeaders};
use crate::state::AppState;

use super::resource::ApiEntity;

/// Handler for replacing an existing record.
///
/// The id travels in the body; every field is overwritten, so omitted
/// optional fields become null.
///
/// # HTTP Request
///
/// `PUT /api/{entities}`
///
/// # Response
///
/// - `200 OK` - Record updated, with alert headers
/// - `400 Bad Request` - The body has no id (`idnull`) or fails validation
/// - `404 Not Found` - No record has that id
pub async fn update_handler<E: ApiEntity>(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<E::Dto>,
) -> RestResult<Response> {
    debug!(entity = E::NAME, id = ?dto.id(), "Processing update request");

    let saved = E::service(state.services()).update(dto).await?;
    let id = saved.id().ok_or_else(|| RestError::InternalError {
        message: format!("{} saved without an id", E::NAME),
    })?;

    let headers = ResourceHeaders::alert(AlertAction::Updated, &E::alert_name(), id);

    Ok((StatusCode::OK, headers.to_header_map(), Json(saved)).into_response())
}
