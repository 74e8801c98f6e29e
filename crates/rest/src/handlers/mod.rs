//! HTTP request handlers.
//!
//! Entity handlers are generic over [`ApiEntity`] and instantiated once per
//! entity by the router:
//!
//! - [`create`] - Create a record
//! - [`update`] - Replace a record
//! - [`read`] - Read a record by id
//! - [`delete`] - Delete a record
//! - [`search`] - Criteria list, count and free-text search
//!
//! Management handlers:
//!
//! - [`health`] - Store and index health
//! - [`management`] - Mirror status, outbox replay and reindexing

pub mod create;
pub mod delete;
pub mod health;
pub mod management;
pub mod read;
pub mod resource;
pub mod search;
pub mod update;

// Re-export handlers for convenience
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use management::{index_status_handler, reindex_handler, replay_handler};
pub use read::read_handler;
pub use resource::ApiEntity;
pub use search::{count_handler, list_handler, search_handler};
pub use update::update_handler;
