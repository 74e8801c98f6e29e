//! Routing configuration for the storefront REST API.

pub mod api_routes;

pub use api_routes::{create_routes, entity_routes};
