//! JSON body extractor.
//!
//! Like `axum::Json`, but rejects with a problem document instead of plain
//! text.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// Axum extractor for a JSON request body.
///
/// A missing `Content-Type` is read as JSON; any other non-JSON media type
/// is rejected with 415.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_persistence::types::ProductDto;
/// use storefront_rest::extractors::JsonBody;
///
/// async fn create_handler(JsonBody(product): JsonBody<ProductDto>) {}
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    /// Consumes the extractor and returns the body.
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Returns true for `application/json` and `*/*+json` media types.
pub fn is_json_content_type(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(mime) => {
            mime.subtype() == mime::JSON || mime.suffix().is_some_and(|s| s == mime::JSON)
        }
        Err(_) => false,
    }
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = content_type
            && !is_json_content_type(&content_type)
        {
            return Err(RestError::UnsupportedMediaType { content_type });
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: e.to_string(),
            })?;

        let value = serde_json::from_slice(&bytes)?;
        Ok(JsonBody(value))
    }
}
