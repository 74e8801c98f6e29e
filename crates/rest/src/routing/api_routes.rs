//! Route configuration.
//!
//! Defines all routes of the storefront REST API.

use axum::{
    Router,
    routing::{get, post},
};
use storefront_persistence::types::{Customer, OrderItem, Product, ProductCategory, ProductOrder};

use crate::handlers::{self, ApiEntity};
use crate::state::AppState;

/// Routes for one entity.
///
/// - `POST /api/{entities}` - Create
/// - `PUT /api/{entities}` - Update
/// - `GET /api/{entities}` - List with criteria
/// - `GET /api/{entities}/count` - Count with criteria
/// - `GET /api/{entities}/{id}` - Read
/// - `DELETE /api/{entities}/{id}` - Delete
/// - `GET /api/_search/{entities}` - Free-text search
pub fn entity_routes<E: ApiEntity>() -> Router<AppState> {
    let base = format!("/api/{}", E::PATH);

    Router::new()
        .route(
            &base,
            post(handlers::create_handler::<E>)
                .put(handlers::update_handler::<E>)
                .get(handlers::list_handler::<E>),
        )
        .route(
            &format!("{}/count", base),
            get(handlers::count_handler::<E>),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(handlers::read_handler::<E>).delete(handlers::delete_handler::<E>),
        )
        .route(
            &format!("/api/_search/{}", E::PATH),
            get(handlers::search_handler::<E>),
        )
}

/// Creates all REST API routes.
///
/// ## Entity routes
/// See [`entity_routes`], for `product-categories`, `products`, `customers`,
/// `product-orders` and `order-items`.
///
/// ## Management routes
/// - `GET /management/health` - Store and index health
/// - `GET /management/health/liveness` - Liveness probe
/// - `GET /management/index` - Mirror status
/// - `POST /management/index/replay` - Replay deferred index writes
/// - `POST /management/index/reindex` - Rebuild all indexes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .merge(entity_routes::<ProductCategory>())
        .merge(entity_routes::<Product>())
        .merge(entity_routes::<Customer>())
        .merge(entity_routes::<ProductOrder>())
        .merge(entity_routes::<OrderItem>())
        .route("/management/health", get(handlers::health_handler))
        .route(
            "/management/health/liveness",
            get(handlers::health::liveness_handler),
        )
        .route("/management/index", get(handlers::index_status_handler))
        .route("/management/index/replay", post(handlers::replay_handler))
        .route("/management/index/reindex", post(handlers::reindex_handler))
        .with_state(state)
}
