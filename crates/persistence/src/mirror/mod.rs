//! Mirroring of relational writes into the search index.
//!
//! Every successful relational write is followed by one [`MirrorEvent`]
//! applied by the [`IndexMirror`]. The relational write is never undone: when
//! the index cannot be updated the event is logged and kept in a bounded
//! [`Outbox`] until a replay succeeds.
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use storefront_persistence::backends::memory::MemoryIndex;
//! use storefront_persistence::mirror::{IndexMirror, MirrorConfig, MirrorEvent, MirrorOutcome};
//!
//! # tokio_test::block_on(async {
//! let index = Arc::new(MemoryIndex::new());
//! let mirror = IndexMirror::new(index.clone(), MirrorConfig::default());
//!
//! let outcome = mirror
//!     .apply(MirrorEvent::upsert("product", 1, json!({"id": 1, "name": "Mug"})))
//!     .await;
//! assert_eq!(outcome, MirrorOutcome::Mirrored);
//! assert_eq!(index.len("product"), 1);
//! # });
//! ```

mod config;
mod outbox;
mod workflow;

use serde_json::Value;

pub use config::{MirrorConfig, RetryConfig};
pub use outbox::Outbox;
pub use workflow::{IndexMirror, MirrorStatus, RecordLane, ReplayReport};

/// One change to propagate to the search index.
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorEvent {
    /// Insert or replace the document of a record.
    Upsert {
        /// Index name of the entity.
        index: String,
        /// Record id.
        id: i64,
        /// The record's DTO JSON.
        document: Value,
    },
    /// Remove the document of a deleted record.
    Delete {
        /// Index name of the entity.
        index: String,
        /// Record id.
        id: i64,
    },
}

impl MirrorEvent {
    /// Creates an upsert event.
    pub fn upsert(index: impl Into<String>, id: i64, document: Value) -> Self {
        MirrorEvent::Upsert {
            index: index.into(),
            id,
            document,
        }
    }

    /// Creates a delete event.
    pub fn delete(index: impl Into<String>, id: i64) -> Self {
        MirrorEvent::Delete {
            index: index.into(),
            id,
        }
    }

    /// Returns the index the event targets.
    pub fn index(&self) -> &str {
        match self {
            MirrorEvent::Upsert { index, .. } | MirrorEvent::Delete { index, .. } => index,
        }
    }

    /// Returns the record id.
    pub fn id(&self) -> i64 {
        match self {
            MirrorEvent::Upsert { id, .. } | MirrorEvent::Delete { id, .. } => *id,
        }
    }

    /// Returns `"upsert"` or `"delete"`, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            MirrorEvent::Upsert { .. } => "upsert",
            MirrorEvent::Delete { .. } => "delete",
        }
    }
}

/// What happened to a mirror event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// The index reflects the event.
    Mirrored,
    /// The index write failed; the event waits in the outbox.
    Deferred,
}
