//! Storage and search index backends.
//!
//! Relational backends implement [`Repository`](crate::core::Repository) for
//! every entity; index backends implement
//! [`SearchIndex`](crate::core::SearchIndex).
//!
//! | Backend | Feature | Role |
//! |---------|---------|------|
//! | SQLite | `sqlite` | Relational store, file or in-memory |
//! | Memory | always | Search index kept in process, for development and tests |
//! | Elasticsearch | `elasticsearch` | Search index |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use storefront_persistence::backends::sqlite::SqliteBackend;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory SQLite backend
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or use a file-based database
//! let backend = SqliteBackend::open("./data/storefront.db")?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod memory;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
