//! Elasticsearch search index.
//!
//! [`ElasticsearchIndex`] implements [`SearchIndex`](crate::core::SearchIndex)
//! on an Elasticsearch cluster. Each entity gets its own index named
//! `{prefix}_{entity}` (e.g. `storefront_orderitem`), holding the entity's
//! DTO JSON under its numeric id. Free-text searches are `query_string`
//! queries with `AND` as the default operator.
//!
//! # Example
//!
//! ```ignore
//! use storefront_persistence::backends::elasticsearch::{ElasticsearchConfig, ElasticsearchIndex};
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let index = ElasticsearchIndex::new(config)?;
//! index.health_check().await?;
//! ```

mod backend;
mod index;
mod schema;

pub use backend::{ElasticsearchAuth, ElasticsearchConfig, ElasticsearchIndex};
