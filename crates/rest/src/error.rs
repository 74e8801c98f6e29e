//! Error types for the storefront REST API.
//!
//! Every error leaves the server as an RFC 7807 problem document with the
//! `application/problem+json` content type:
//!
//! ```json
//! {
//!   "type": "https://www.storefront.dev/problem/problem-with-message",
//!   "title": "Bad Request",
//!   "status": 400,
//!   "detail": "A new ProductOrder cannot already have an ID",
//!   "entityName": "productOrder",
//!   "errorKey": "idexists"
//! }
//! ```
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | errorKey |
//! |--------------|-------------|----------|
//! | Validation (fields) | 400 | validation |
//! | Validation (reference) | 400 | invalidreference |
//! | IdPresent | 400 | idexists |
//! | IdMissing | 400 | idnull |
//! | Criteria | 400 | badcriteria |
//! | Index (query parse) | 400 | badquery |
//! | (non-JSON body) | 415 | unsupportedmediatype |
//! | NotFound | 404 | notfound |
//! | InUse | 409 | inuse |
//! | Index (other) | 503 | indexunavailable |
//! | Backend | 500 | internal |

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use storefront_persistence::error::{
    BackendError, CriteriaError, FieldViolation, IdentityError, IndexError, ResourceError,
    StorageError, ValidationError,
};
use thiserror::Error;
use tracing::error;

/// Content type of every error body.
pub const PROBLEM_JSON: &str = "application/problem+json";

const PROBLEM_BASE_URL: &str = "https://www.storefront.dev/problem";

/// The primary error type for REST API operations.
///
/// Variants map one-to-one onto an HTTP status and an `errorKey` the admin
/// frontend translates.
#[derive(Debug, Error)]
pub enum RestError {
    /// A record failed field validation (HTTP 400).
    #[error("Invalid {entity}: {message}")]
    Validation {
        /// Entity display name.
        entity: String,
        /// Error message.
        message: String,
        /// The rejected fields.
        field_errors: Vec<FieldViolation>,
    },

    /// A foreign key names a missing record (HTTP 400).
    #[error("Invalid reference from {entity}: {message}")]
    InvalidReference {
        /// Entity display name.
        entity: String,
        /// Error message.
        message: String,
    },

    /// Create with an id (HTTP 400).
    #[error("A new {entity} cannot already have an ID")]
    IdExists {
        /// Entity display name.
        entity: String,
    },

    /// Update without an id (HTTP 400).
    #[error("Invalid id for {entity}")]
    IdNull {
        /// Entity display name.
        entity: String,
    },

    /// Malformed filter or paging parameters (HTTP 400).
    #[error("Bad criteria: {message}")]
    BadCriteria {
        /// Error message.
        message: String,
    },

    /// Malformed free-text query (HTTP 400).
    #[error("Bad search query '{query}': {message}")]
    BadQuery {
        /// The rejected query.
        query: String,
        /// Error message.
        message: String,
    },

    /// Malformed request (HTTP 400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Request body is not JSON (HTTP 415).
    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType {
        /// The rejected content type.
        content_type: String,
    },

    /// Record not found (HTTP 404).
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity display name.
        entity: String,
        /// The record id.
        id: i64,
    },

    /// Record still referenced by others (HTTP 409).
    #[error("{entity} {id} is still referenced")]
    InUse {
        /// Entity display name.
        entity: String,
        /// The record id.
        id: i64,
    },

    /// Search index unreachable or failing (HTTP 503).
    #[error("Search index unavailable: {message}")]
    IndexUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    #[error("Internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

/// One entry of `fieldErrors`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldErrorBody<'a> {
    object_name: &'a str,
    field: &'a str,
    message: &'a str,
}

/// The problem document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemBody<'a> {
    #[serde(rename = "type")]
    problem_type: String,
    title: &'a str,
    status: u16,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_name: Option<String>,
    error_key: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    field_errors: Vec<FieldErrorBody<'a>>,
}

/// Turns a display name such as `ProductOrder` into `productOrder`.
pub fn alert_name(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::Validation { .. }
            | RestError::InvalidReference { .. }
            | RestError::IdExists { .. }
            | RestError::IdNull { .. }
            | RestError::BadCriteria { .. }
            | RestError::BadQuery { .. }
            | RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::InUse { .. } => StatusCode::CONFLICT,
            RestError::IndexUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error key.
    pub fn error_key(&self) -> &'static str {
        match self {
            RestError::Validation { .. } => "validation",
            RestError::InvalidReference { .. } => "invalidreference",
            RestError::IdExists { .. } => "idexists",
            RestError::IdNull { .. } => "idnull",
            RestError::BadCriteria { .. } => "badcriteria",
            RestError::BadQuery { .. } => "badquery",
            RestError::BadRequest { .. } => "badrequest",
            RestError::UnsupportedMediaType { .. } => "unsupportedmediatype",
            RestError::NotFound { .. } => "notfound",
            RestError::InUse { .. } => "inuse",
            RestError::IndexUnavailable { .. } => "indexunavailable",
            RestError::InternalError { .. } => "internal",
        }
    }

    fn entity(&self) -> Option<&str> {
        match self {
            RestError::Validation { entity, .. }
            | RestError::InvalidReference { entity, .. }
            | RestError::IdExists { entity }
            | RestError::IdNull { entity }
            | RestError::NotFound { entity, .. }
            | RestError::InUse { entity, .. } => Some(entity),
            _ => None,
        }
    }

    fn problem_type(&self) -> String {
        match self {
            RestError::Validation { .. } => format!("{}/constraint-violation", PROBLEM_BASE_URL),
            RestError::NotFound { .. } => format!("{}/not-found", PROBLEM_BASE_URL),
            _ => format!("{}/problem-with-message", PROBLEM_BASE_URL),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let title = status.canonical_reason().unwrap_or("Error");
        let field_errors = match &self {
            RestError::Validation {
                entity,
                field_errors,
                ..
            } => field_errors
                .iter()
                .map(|v| FieldErrorBody {
                    object_name: entity,
                    field: &v.field,
                    message: &v.reason,
                })
                .collect(),
            _ => Vec::new(),
        };

        let body = ProblemBody {
            problem_type: self.problem_type(),
            title,
            status: status.as_u16(),
            detail: self.to_string(),
            entity_name: self.entity().map(alert_name),
            error_key: self.error_key(),
            field_errors,
        };

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_JSON),
        );
        response
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Identity(e) => e.into(),
            StorageError::Resource(e) => e.into(),
            StorageError::Criteria(e) => e.into(),
            StorageError::Index(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidFields { entity, violations } => {
                let message = violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                RestError::Validation {
                    entity,
                    message,
                    field_errors: violations,
                }
            }
            ValidationError::InvalidReference { entity, message } => {
                RestError::InvalidReference { entity, message }
            }
        }
    }
}

impl From<IdentityError> for RestError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::IdPresent { entity } => RestError::IdExists { entity },
            IdentityError::IdMissing { entity } => RestError::IdNull { entity },
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { entity, id } => RestError::NotFound { entity, id },
            ResourceError::InUse { entity, id } => RestError::InUse { entity, id },
        }
    }
}

impl From<CriteriaError> for RestError {
    fn from(err: CriteriaError) -> Self {
        RestError::BadCriteria {
            message: err.to_string(),
        }
    }
}

impl From<IndexError> for RestError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::QueryParse { query, message } => RestError::BadQuery { query, message },
            IndexError::Unavailable { .. }
            | IndexError::Request { .. }
            | IndexError::Document { .. } => RestError::IndexUnavailable {
                message: err.to_string(),
            },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_alert_name() {
        assert_eq!(alert_name("ProductOrder"), "productOrder");
        assert_eq!(alert_name("Customer"), "customer");
        assert_eq!(alert_name(""), "");
    }

    #[test]
    fn test_not_found_display() {
        let err = RestError::NotFound {
            entity: "Product".to_string(),
            id: 123,
        };
        assert_eq!(err.to_string(), "Product not found: 123");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_identity_errors_map_to_keys() {
        let exists: RestError = StorageError::Identity(IdentityError::IdPresent {
            entity: "ProductOrder".to_string(),
        })
        .into();
        assert_eq!(exists.error_key(), "idexists");
        assert_eq!(exists.status(), StatusCode::BAD_REQUEST);

        let null: RestError = StorageError::Identity(IdentityError::IdMissing {
            entity: "ProductOrder".to_string(),
        })
        .into();
        assert_eq!(null.error_key(), "idnull");
    }

    #[test]
    fn test_index_errors_split_by_kind() {
        let parse: RestError = IndexError::QueryParse {
            query: "name:".to_string(),
            message: "missing value".to_string(),
        }
        .into();
        assert_eq!(parse.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse.error_key(), "badquery");

        let down: RestError = IndexError::Unavailable {
            backend_name: "elasticsearch".to_string(),
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(down.error_key(), "indexunavailable");
    }

    #[test]
    fn test_in_use_is_conflict() {
        let err: RestError = ResourceError::InUse {
            entity: "ProductCategory".to_string(),
            id: 1,
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.error_key(), "inuse");
    }

    #[tokio::test]
    async fn test_problem_body() {
        let response = RestError::IdExists {
            entity: "ProductOrder".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_JSON
        );

        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["title"], "Bad Request");
        assert_eq!(body["entityName"], "productOrder");
        assert_eq!(body["errorKey"], "idexists");
        assert!(body.get("fieldErrors").is_none());
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let err: RestError = ValidationError::InvalidFields {
            entity: "OrderItem".to_string(),
            violations: vec![
                FieldViolation::not_null("quantity"),
                FieldViolation::min("totalPrice", 0),
            ],
        }
        .into();

        let body = body_json(err.into_response()).await;
        assert_eq!(body["errorKey"], "validation");
        assert_eq!(body["fieldErrors"].as_array().unwrap().len(), 2);
        assert_eq!(body["fieldErrors"][0]["objectName"], "OrderItem");
        assert_eq!(body["fieldErrors"][0]["field"], "quantity");
        assert_eq!(body["fieldErrors"][0]["message"], "NotNull");
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .contains("quantity must not be null")
        );
    }

    #[tokio::test]
    async fn test_backend_error_is_internal() {
        let err: RestError = BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["errorKey"], "internal");
        assert!(body.get("entityName").is_none());
    }
}
