//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates validation, identity, resource state,
//! criteria parsing, search index and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record shape errors, detected before touching a store
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Create with an id, or update without one
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Malformed filter or paging parameters
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    /// Search index errors
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// The transport field name (camelCase).
    pub field: String,
    /// Short machine-readable reason, e.g. `NotNull` or `Min`.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldViolation {
    /// A required field was absent.
    pub fn not_null(field: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: "NotNull".to_string(),
            message: "must not be null".to_string(),
        }
    }

    /// A numeric field was below its lower bound.
    pub fn min(field: &str, bound: impl fmt::Display) -> Self {
        Self {
            field: field.to_string(),
            reason: "Min".to_string(),
            message: format!("must be greater than or equal to {}", bound),
        }
    }

    /// A text field did not match the expected shape.
    pub fn pattern(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: "Pattern".to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised when a record fails validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// One or more fields were missing or out of range.
    #[error("invalid {entity}: {}", join_violations(.violations))]
    InvalidFields {
        entity: String,
        violations: Vec<FieldViolation>,
    },

    /// A foreign key points at a record that does not exist.
    #[error("invalid reference from {entity}: {message}")]
    InvalidReference { entity: String, message: String },
}

impl ValidationError {
    /// Returns the field violations, if any.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationError::InvalidFields { violations, .. } => violations,
            ValidationError::InvalidReference { .. } => &[],
        }
    }
}

/// Errors related to record identity on create and update.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// A new record cannot already have an id.
    #[error("a new {entity} cannot already have an id")]
    IdPresent { entity: String },

    /// An update needs the id of the record to change.
    #[error("invalid id: {entity} update requires an id")]
    IdMissing { entity: String },
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// The record is still referenced by other records.
    #[error("{entity} {id} is still referenced and cannot be deleted")]
    InUse { entity: String, id: i64 },
}

/// Errors raised while parsing filter criteria or paging parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// The key is not of the form `field.operator`.
    #[error("invalid criteria key '{key}': expected <field>.<operator>")]
    InvalidKey { key: String },

    /// The entity has no filterable field with this name.
    #[error("unknown filter field '{field}'")]
    UnknownField { field: String },

    /// The operator is not one of the supported filter operators.
    #[error("unknown filter operator '{operator}'")]
    UnknownOperator { operator: String },

    /// The operator is not supported by the field's type.
    #[error("operator '{operator}' is not supported for field '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    /// The value could not be parsed into the field's type.
    #[error("invalid value '{value}' for {field}.{operator}: {message}")]
    InvalidValue {
        field: String,
        operator: String,
        value: String,
        message: String,
    },

    /// The sort field is not sortable for this entity.
    #[error("unknown sort property '{property}'")]
    UnknownSortProperty { property: String },

    /// A paging parameter was malformed.
    #[error("invalid paging parameter '{parameter}': {message}")]
    InvalidPaging { parameter: String, message: String },
}

/// Errors originating from the search index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index backend is unreachable.
    #[error("search index unavailable ({backend_name}): {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The index rejected a request.
    #[error("search index request failed ({backend_name}): {message}")]
    Request {
        backend_name: String,
        message: String,
    },

    /// The free-text query could not be parsed.
    #[error("invalid search query '{query}': {message}")]
    QueryParse { query: String, message: String },

    /// A stored document could not be converted back into a record.
    #[error("malformed index document: {message}")]
    Document { message: String },
}

/// Errors originating from the relational backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for search index operations.
pub type IndexResult<T> = Result<T, IndexError>;

// Implement conversions from common error types

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Document {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(feature = "elasticsearch")]
impl From<elasticsearch::Error> for IndexError {
    fn from(err: elasticsearch::Error) -> Self {
        IndexError::Unavailable {
            backend_name: "elasticsearch".to_string(),
            message: err.to_string(),
        }
    }
}
