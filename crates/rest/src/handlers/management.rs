//! Search index maintenance endpoints.
//!
//! - `GET /management/index` - mirror counters and outbox size
//! - `POST /management/index/replay` - re-apply deferred index writes
//! - `POST /management/index/reindex` - rebuild every index from the store

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::error::RestResult;
use crate::state::AppState;

/// Handler returning the mirror status.
pub async fn index_status_handler(State(state): State<AppState>) -> Response {
    Json(state.mirror().status()).into_response()
}

/// Handler replaying the outbox, oldest first.
///
/// Always `200 OK`; the body reports how many events were replayed and how
/// many remain pending.
pub async fn replay_handler(State(state): State<AppState>) -> Response {
    debug!("Processing outbox replay request");
    Json(state.mirror().replay_pending().await).into_response()
}

/// Handler rebuilding every entity index from the relational store.
///
/// # Response
///
/// - `200 OK` - `{"entities": {"<Entity>": n, ...}, "total": n}`
/// - `503 Service Unavailable` - The index cannot be reached
pub async fn reindex_handler(State(state): State<AppState>) -> RestResult<Response> {
    info!("Rebuilding search indexes");

    let written = state.services().reindex_all().await?;
    let total: u64 = written.iter().map(|(_, n)| n).sum();
    let entities: Map<String, Value> = written
        .into_iter()
        .map(|(entity, n)| (entity.to_string(), Value::from(n)))
        .collect();

    Ok(Json(json!({ "entities": entities, "total": total })).into_response())
}
