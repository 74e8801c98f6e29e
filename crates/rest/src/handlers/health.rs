//! Health check endpoint handler.
//!
//! Reports the relational store and the search index separately, for
//! monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::state::AppState;

fn component(backend: &str, result: Result<(), String>) -> (bool, Value) {
    match result {
        Ok(()) => (true, json!({ "status": "UP", "details": { "backend": backend } })),
        Err(error) => (
            false,
            json!({ "status": "DOWN", "details": { "backend": backend, "error": error } }),
        ),
    }
}

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /management/health`
///
/// # Response
///
/// - `200 OK` - Store and index are reachable
/// - `503 Service Unavailable` - At least one of them is not
pub async fn health_handler(State(state): State<AppState>) -> Response {
    debug!("Processing health check request");

    let services = state.services();
    let index = state.mirror().index();

    let (db_up, db) = component(
        services.store_kind().as_str(),
        services.health_check().await.map_err(|e| e.to_string()),
    );
    let (index_up, index_status) = component(
        index.backend_kind().as_str(),
        index.health_check().await.map_err(|e| e.to_string()),
    );

    let up = db_up && index_up;
    if !up {
        warn!(db = db_up, index = index_up, "Health check failed");
    }

    let body = json!({
        "status": if up { "UP" } else { "DOWN" },
        "components": {
            "db": db,
            "searchIndex": index_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    let status = if up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}

/// Handler for a liveness probe.
///
/// # HTTP Request
///
/// `GET /management/health/liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}
