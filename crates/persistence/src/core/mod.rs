//! Core storage traits and abstractions.
//!
//! - [`Entity`] - A record type with its DTO, criteria and index name
//! - [`Repository`] - CRUD and criteria queries against the relational store
//! - [`SearchIndex`] - Document upserts, deletes and free-text queries
//! - [`BackendKind`] - Names the backend behind either facade
//!
//! Services hold both facades as trait objects, so any relational store can
//! be paired with any index:
//!
//! ```text
//! EntityService<E>
//!     ├── Arc<dyn Repository<E>>   (reads, writes)
//!     └── Arc<IndexMirror>
//!             └── Arc<dyn SearchIndex>   (mirror writes, free-text search)
//! ```

mod backend;
mod entity;
mod repository;
mod search_index;

pub use backend::BackendKind;
pub use entity::Entity;
pub use repository::Repository;
pub use search_index::{IndexHits, SearchIndex};
