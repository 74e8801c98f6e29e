//! Pagination extractor.
//!
//! Extracts `page`, `size` and repeated `sort` parameters from requests.

use axum::{extract::FromRequestParts, http::request::Parts};
use storefront_persistence::error::CriteriaError;
use storefront_persistence::types::{PageRequest, SortOrder};

use crate::error::RestError;
use crate::state::AppState;

use super::query_pairs;

/// Axum extractor for pagination parameters.
///
/// `page` is zero-based. A missing or zero `size` uses the configured
/// default, and a larger `size` than the configured maximum is capped.
/// `sort=<property>[,asc|desc]` may repeat; properties are checked by the
/// store, not here.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_rest::extractors::Pagination;
///
/// async fn list_handler(pagination: Pagination) {
///     let request = pagination.into_inner();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination(pub PageRequest);

impl Pagination {
    /// Parses pagination from raw query pairs.
    pub fn from_pairs<'a, I>(
        pairs: I,
        default_size: u32,
        max_size: u32,
    ) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = PageRequest::new(0, default_size);

        for (key, value) in pairs {
            match key {
                "page" => request.page = parse_number("page", value)?,
                "size" => {
                    let size = parse_number("size", value)?;
                    request.size = if size == 0 {
                        default_size
                    } else {
                        size.min(max_size)
                    };
                }
                "sort" => request.sort.push(SortOrder::parse(value)?),
                _ => {}
            }
        }

        Ok(Pagination(request))
    }

    /// Returns the page request.
    pub fn request(&self) -> &PageRequest {
        &self.0
    }

    /// Consumes the extractor and returns the page request.
    pub fn into_inner(self) -> PageRequest {
        self.0
    }
}

fn parse_number(parameter: &str, value: &str) -> Result<u32, CriteriaError> {
    value
        .trim()
        .parse()
        .map_err(|_| CriteriaError::InvalidPaging {
            parameter: parameter.to_string(),
            message: format!("'{}' is not a non-negative integer", value),
        })
}

impl FromRequestParts<AppState> for Pagination {
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts);
        let pagination = Pagination::from_pairs(
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            state.default_page_size(),
            state.max_page_size(),
        )?;
        Ok(pagination)
    }
}
