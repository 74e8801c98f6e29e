//! Storefront Persistence Layer
//!
//! This crate stores the storefront's records (product categories, products,
//! customers, product orders and order items) in a relational store and
//! mirrors each of them into a free-text search index.
//!
//! # Features
//!
//! - **Criteria queries**: per-field filter descriptors translated into one
//!   SQL predicate that serves both paging and counting
//! - **Dual write**: every relational write is followed by an index write;
//!   index failures are logged and deferred, never surfaced
//! - **Free-text search**: `query_string` expressions against the index
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite relational store, file or in-memory
//! - `elasticsearch` - Elasticsearch search index
//!
//! The in-process [`MemoryIndex`](backends::memory::MemoryIndex) is always
//! available.
//!
//! # Architecture
//!
//! - [`types`] - Entities, DTOs, enums and pagination
//! - [`criteria`] - Filter descriptors and per-entity criteria
//! - [`mapping`] - Entity to DTO conversion and validation
//! - [`core`] - The [`Repository`] and [`SearchIndex`] traits
//! - [`backends`] - SQLite, in-memory and Elasticsearch implementations
//! - [`mirror`] - The write-then-mirror workflow with its outbox
//! - [`service`] - Per-entity services tying it all together
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use storefront_persistence::backends::memory::MemoryIndex;
//! use storefront_persistence::backends::sqlite::SqliteBackend;
//! use storefront_persistence::criteria::{Criteria, ProductCategoryCriteria};
//! use storefront_persistence::mirror::{IndexMirror, MirrorConfig};
//! use storefront_persistence::service::Services;
//! use storefront_persistence::types::{PageRequest, ProductCategoryDto};
//!
//! let store = SqliteBackend::open("./data/storefront.db")?;
//! store.init_schema()?;
//!
//! let mirror = Arc::new(IndexMirror::new(
//!     Arc::new(MemoryIndex::new()),
//!     MirrorConfig::default(),
//! ));
//! let services = Services::new(Arc::new(store), mirror);
//!
//! let saved = services
//!     .product_categories
//!     .create(ProductCategoryDto {
//!         name: Some("Shirts".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let criteria = ProductCategoryCriteria::from_pairs([("name.equals", "Shirts")])?;
//! assert_eq!(services.product_categories.count_by_criteria(&criteria).await?, 1);
//!
//! let hits = services
//!     .product_categories
//!     .search(&format!("id:{}", saved.id.unwrap_or_default()), &PageRequest::default())
//!     .await?;
//! assert_eq!(hits.total_elements, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod criteria;
pub mod error;
pub mod mapping;
pub mod mirror;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use types::{Page, PageRequest};

// Re-export core traits
pub use core::{BackendKind, Entity, IndexHits, Repository, SearchIndex};

pub use mirror::{IndexMirror, MirrorConfig, MirrorOutcome};
pub use service::{EntityService, Services};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
