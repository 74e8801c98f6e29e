//! Response header generation.
//!
//! Provides the entity alert headers the admin frontend turns into toast
//! notifications, plus `Location` for created records.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use url::form_urlencoded;

/// Application name used in alert message keys.
pub const APPLICATION_NAME: &str = "storefrontApp";

/// Header carrying the alert message key.
pub const ALERT_HEADER: HeaderName = HeaderName::from_static("x-storefront-alert");

/// Header carrying the alert parameter (the affected id).
pub const PARAMS_HEADER: HeaderName = HeaderName::from_static("x-storefront-params");

/// What happened to the record an alert refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// The record was created.
    Created,
    /// The record was updated.
    Updated,
    /// The record was deleted.
    Deleted,
}

impl AlertAction {
    fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Created => "created",
            AlertAction::Updated => "updated",
            AlertAction::Deleted => "deleted",
        }
    }
}

/// Builder for entity response headers.
///
/// Generates:
/// - `X-Storefront-Alert: storefrontApp.<entity>.<action>`
/// - `X-Storefront-Params: <id>` (URL-encoded)
/// - `Location` (for created records)
#[derive(Debug, Default)]
pub struct ResourceHeaders {
    /// Alert message key.
    alert: Option<String>,
    /// Alert parameter.
    params: Option<String>,
    /// Location URL (for created records).
    location: Option<String>,
}

impl ResourceHeaders {
    /// Creates an empty ResourceHeaders builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the alert headers for an action on one record.
    ///
    /// `entity` is the alert name, e.g. `productOrder`.
    pub fn alert(action: AlertAction, entity: &str, id: impl ToString) -> Self {
        Self {
            alert: Some(format!("{}.{}.{}", APPLICATION_NAME, entity, action.as_str())),
            params: Some(form_urlencoded::byte_serialize(id.to_string().as_bytes()).collect()),
            location: None,
        }
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(alert) = &self.alert
            && let Ok(value) = HeaderValue::from_str(alert)
        {
            headers.insert(ALERT_HEADER, value);
        }

        if let Some(params) = &self.params
            && let Ok(value) = HeaderValue::from_str(params)
        {
            headers.insert(PARAMS_HEADER, value);
        }

        if let Some(location) = &self.location
            && let Ok(value) = HeaderValue::from_str(location)
        {
            headers.insert(header::LOCATION, value);
        }

        headers
    }

    /// Returns the alert message key.
    pub fn alert_key(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}
