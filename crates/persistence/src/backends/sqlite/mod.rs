//! SQLite backend implementation.
//!
//! Implements [`Repository`](crate::core::Repository) for every entity over a
//! pooled SQLite database. In-memory databases are meant for tests and
//! development; file databases run in WAL mode.
//!
//! # Example
//!
//! ```no_run
//! use storefront_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("./storefront.db")?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! One table per entity with `INTEGER PRIMARY KEY AUTOINCREMENT` ids and
//! nullable foreign keys:
//!
//! ```sql
//! CREATE TABLE order_item (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     quantity INTEGER NOT NULL CHECK (quantity >= 0),
//!     total_price TEXT NOT NULL,        -- decimal comparison key
//!     status TEXT NOT NULL,
//!     product_id INTEGER REFERENCES product (id),
//!     order_id INTEGER REFERENCES product_order (id)
//! );
//! ```
//!
//! Decimals are stored as fixed-width comparison keys, exact and ordered as
//! text; instants are stored as RFC 3339 UTC text with nanosecond precision,
//! so text order is time order.

mod backend;
mod decimal;
mod query;
mod repository;
mod schema;
mod tables;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use query::{Column, Specification, SqlFragment, SqlParam};
pub use tables::SqliteTable;
