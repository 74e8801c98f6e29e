//! Create handler.
//!
//! `POST /api/{entities}`

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

/// Handler for creating a record. The server assigns the id.
///
/// # HTTP Request
///
/// `POST /api/{entities}`
///
/// # Response
///
/// - `201 Created` - Record created, with `Location` and alert headers
/// - `400 Bad Request` - The body carries an id (`idexists`) or fails validation
///
/// # Example
///
/// ```http
/// POST /api/product-categories HTTP/1.1
/// Content-Type: application/json
///
/// {"name": "Shirts"}
/// ```
pub async fn create_handler<E: ApiEntity>(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<E::Dto>,
) -> RestResult<Response> {
    debug!(entity = E::NAME, "Processing create request");

    let saved = E::service(state.services()).create(dto).await?;
    let id = saved.id().ok_or_else(|| RestError::InternalError {
        message: format!("{} saved without an id", E::NAME),
    })?;

    let location = format!("{}/api/{}/{}", state.base_url(), E::PATH, id);
    let headers = ResourceHeaders::alert(AlertAction::Created, &E::alert_name(), id)
        .with_location(location);

    debug!(entity = E::NAME, id, "Record created");

    Ok((StatusCode::CREATED, headers.to_header_map(), Json(saved)).into_response())
}
