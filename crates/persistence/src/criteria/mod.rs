//! Criteria: optional per-field filters narrowing a query.
//!
//! A criteria object holds at most one descriptor per filterable field. Each
//! set operator of each descriptor becomes one [`FieldPredicate`], and all
//! predicates are ANDed together. There is no OR.
//!
//! Criteria are usually parsed from query-string pairs of the form
//! `<field>.<operator>=<value>`:
//!
//! ```
//! use storefront_persistence::criteria::{Criteria, ProductCriteria};
//!
//! let criteria = ProductCriteria::from_pairs([
//!     ("name.contains", "Shirt"),
//!     ("price.lessThanOrEqual", "25.00"),
//!     ("size.in", "M,L"),
//! ])
//! .unwrap();
//!
//! assert_eq!(criteria.predicates().len(), 3);
//! assert!(ProductCriteria::from_pairs([("price.greaterThan", "cheap")]).is_err());
//! ```

// Operator and value variants are named after their query-string spelling
#![allow(missing_docs)]

mod filter;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::error::CriteriaError;

pub use entities::{
    CustomerCriteria, OrderItemCriteria, ProductCategoryCriteria, ProductCriteria,
    ProductOrderCriteria,
};
pub use filter::{FieldFilter, Filter, FilterValue, RangeFilter, StringFilter};

/// A filter operator, as written after the dot in a criteria key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Specified,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
}

impl Operator {
    /// Returns the query-string spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Specified => "specified",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThan => "lessThan",
            Operator::LessThanOrEqual => "lessThanOrEqual",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesNotContain",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(Operator::Equals),
            "notEquals" => Ok(Operator::NotEquals),
            "in" => Ok(Operator::In),
            "notIn" => Ok(Operator::NotIn),
            "specified" => Ok(Operator::Specified),
            "greaterThan" => Ok(Operator::GreaterThan),
            "greaterThanOrEqual" => Ok(Operator::GreaterThanOrEqual),
            "lessThan" => Ok(Operator::LessThan),
            "lessThanOrEqual" => Ok(Operator::LessThanOrEqual),
            "contains" => Ok(Operator::Contains),
            "doesNotContain" => Ok(Operator::DoesNotContain),
            other => Err(CriteriaError::UnknownOperator {
                operator: other.to_string(),
            }),
        }
    }
}

/// A typed filter operand, independent of any backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Instant(DateTime<Utc>),
}

impl CriteriaValue {
    /// Canonical text of an instant; its lexical order is its time order.
    ///
    /// Always nine fractional digits, so no precision is lost.
    pub fn instant_text(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// A single condition on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(CriteriaValue),
    NotEquals(CriteriaValue),
    In(Vec<CriteriaValue>),
    NotIn(Vec<CriteriaValue>),
    IsNull,
    IsNotNull,
    GreaterThan(CriteriaValue),
    GreaterThanOrEqual(CriteriaValue),
    LessThan(CriteriaValue),
    LessThanOrEqual(CriteriaValue),
    Contains(String),
    DoesNotContain(String),
}

/// A predicate bound to a transport field name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub field: &'static str,
    pub predicate: Predicate,
}

/// Splits `field.operator` at the last dot.
pub fn split_key(key: &str) -> Result<(&str, Operator), CriteriaError> {
    let (field, operator) = key
        .rsplit_once('.')
        .filter(|(field, operator)| !field.is_empty() && !operator.is_empty())
        .ok_or_else(|| CriteriaError::InvalidKey {
            key: key.to_string(),
        })?;
    Ok((field, operator.parse()?))
}

/// A per-entity set of optional field filters.
pub trait Criteria: fmt::Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    /// Names of the filterable fields.
    fn field_names() -> &'static [&'static str];

    /// Records one `field.operator=raw` pair.
    fn apply(&mut self, field: &str, operator: Operator, raw: &str) -> Result<(), CriteriaError>;

    /// Returns every set condition, to be ANDed together.
    fn predicates(&self) -> Vec<FieldPredicate>;

    /// Returns true when no descriptor is set; such criteria match everything.
    fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    /// Parses criteria from `(key, value)` pairs such as `("name.contains", "x")`.
    fn from_pairs<I, K, V>(pairs: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            let (field, operator) = split_key(key.as_ref())?;
            criteria.apply(field, operator, value.as_ref())?;
        }
        Ok(criteria)
    }
}

/// Declares a criteria struct from `field: Descriptor => "transportName"` lines.
macro_rules! define_criteria {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($field:ident : $filter:ty => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(pub $field: Option<$filter>,)+
        }

        impl $crate::criteria::Criteria for $name {
            fn field_names() -> &'static [&'static str] {
                &[$($key),+]
            }

            fn apply(
                &mut self,
                field: &str,
                operator: $crate::criteria::Operator,
                raw: &str,
            ) -> Result<(), $crate::error::CriteriaError> {
                use $crate::criteria::FieldFilter;
                match field {
                    $($key => self.$field.get_or_insert_with(Default::default).apply(field, operator, raw),)+
                    other => Err($crate::error::CriteriaError::UnknownField {
                        field: other.to_string(),
                    }),
                }
            }

            fn predicates(&self) -> Vec<$crate::criteria::FieldPredicate> {
                use $crate::criteria::FieldFilter;
                let mut out = Vec::new();
                $(
                    if let Some(filter) = &self.$field {
                        filter.collect($key, &mut out);
                    }
                )+
                out
            }
        }
    };
}

mod entities;
