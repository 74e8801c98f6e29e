//! Criteria extractor.
//!
//! Parses `<field>.<operator>=<value>` query parameters into an entity's
//! criteria, leaving paging and cache-busting parameters alone.

use axum::{extract::FromRequestParts, http::request::Parts};
use storefront_persistence::criteria::Criteria;
use storefront_persistence::error::CriteriaError;

use crate::error::RestError;

use super::query_pairs;

/// Query parameters that are never filters.
pub const RESERVED_PARAMETERS: &[&str] = &["page", "size", "sort", "query", "cacheBuster"];

/// Axum extractor for entity criteria.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_persistence::criteria::ProductCriteria;
/// use storefront_rest::extractors::CriteriaQuery;
///
/// async fn count_handler(CriteriaQuery(criteria): CriteriaQuery<ProductCriteria>) {}
/// ```
#[derive(Debug, Clone, Default)]
pub struct CriteriaQuery<C>(pub C);

impl<C: Criteria> CriteriaQuery<C> {
    /// Parses criteria from raw query pairs, skipping reserved parameters.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let filters = pairs
            .into_iter()
            .filter(|(key, _)| !RESERVED_PARAMETERS.contains(key));
        Ok(CriteriaQuery(C::from_pairs(filters)?))
    }

    /// Consumes the extractor and returns the criteria.
    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<S, C> FromRequestParts<S> for CriteriaQuery<C>
where
    S: Send + Sync,
    C: Criteria,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts);
        let criteria = CriteriaQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_persistence::criteria::{CustomerCriteria, ProductCriteria};

    #[test]
    fn test_reserved_parameters_skipped() {
        let CriteriaQuery(criteria) = CriteriaQuery::<ProductCriteria>::from_pairs([
            ("page", "0"),
            ("size", "20"),
            ("sort", "id,asc"),
            ("cacheBuster", "1700000000"),
            ("name.contains", "Shirt"),
        ])
        .unwrap();

        assert_eq!(criteria.predicates().len(), 1);
        assert!(criteria.name.is_some());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = CriteriaQuery::<CustomerCriteria>::from_pairs([("shoeSize.equals", "9")])
            .unwrap_err();
        assert!(matches!(err, CriteriaError::UnknownField { .. }));
    }

    #[test]
    fn test_malformed_value_rejected() {
        let err = CriteriaQuery::<ProductCriteria>::from_pairs([("price.greaterThan", "cheap")])
            .unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidValue { .. }));
    }
}
