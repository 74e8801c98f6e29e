//! Backend identification.
//!
//! Both the relational store and the search index report a [`BackendKind`]
//! so that logs, errors and the health endpoint can name what they talk to.

use std::fmt;

/// Identifies the type of storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// SQLite database (file-based or in-memory).
    Sqlite,
    /// Elasticsearch search engine.
    Elasticsearch,
    /// In-process search index.
    Memory,
    /// Custom or test backend.
    Custom(&'static str),
}

impl BackendKind {
    /// Returns the lower-case backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Elasticsearch => "elasticsearch",
            BackendKind::Memory => "memory",
            BackendKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
