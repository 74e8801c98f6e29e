//! Response headers for the storefront REST API.
//!
//! - [`headers`] - Entity alert headers and `Location`
//! - [`pagination`] - `X-Total-Count` and `Link` for paged results

pub mod headers;
pub mod pagination;

pub use headers::{AlertAction, ResourceHeaders};
pub use pagination::pagination_headers;
