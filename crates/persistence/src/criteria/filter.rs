//! Per-field filter descriptors.
//!
//! There are three descriptor shapes, chosen by field type:
//!
//! | Descriptor | Field types | Operators |
//! |------------|-------------|-----------|
//! | [`Filter<T>`] | enums | `equals`, `notEquals`, `in`, `notIn`, `specified` |
//! | [`RangeFilter<T>`] | ids, integers, decimals, instants | [`Filter`] plus `greaterThan`, `greaterThanOrEqual`, `lessThan`, `lessThanOrEqual` |
//! | [`StringFilter`] | text | [`Filter`] plus `contains`, `doesNotContain` |

#![allow(missing_docs)]

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::CriteriaError;
use crate::types::{Gender, OrderItemStatus, OrderStatus, Size};

use super::{CriteriaValue, FieldPredicate, Operator, Predicate};

/// A value type that can appear in a filter.
pub trait FilterValue: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Parses one raw query-string value.
    fn parse_filter_value(raw: &str) -> Result<Self, String>;

    /// Converts into the backend-neutral value.
    fn to_criteria_value(&self) -> CriteriaValue;
}

impl FilterValue for i64 {
    fn parse_filter_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| "not a valid integer".to_string())
    }

    fn to_criteria_value(&self) -> CriteriaValue {
        CriteriaValue::Integer(*self)
    }
}

impl FilterValue for i32 {
    fn parse_filter_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| "not a valid 32-bit integer".to_string())
    }

    fn to_criteria_value(&self) -> CriteriaValue {
        CriteriaValue::Integer(i64::from(*self))
    }
}

impl FilterValue for Decimal {
    fn parse_filter_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| "not a valid decimal number".to_string())
    }

    fn to_criteria_value(&self) -> CriteriaValue {
        CriteriaValue::Decimal(*self)
    }
}

impl FilterValue for String {
    fn parse_filter_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn to_criteria_value(&self) -> CriteriaValue {
        CriteriaValue::Text(self.clone())
    }
}

impl FilterValue for DateTime<Utc> {
    fn parse_filter_value(raw: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("not an RFC 3339 instant ({})", e))
    }

    fn to_criteria_value(&self) -> CriteriaValue {
        CriteriaValue::Instant(*self)
    }
}

macro_rules! enum_filter_value {
    ($($enum:ty),+ $(,)?) => {
        $(
            impl FilterValue for $enum {
                fn parse_filter_value(raw: &str) -> Result<Self, String> {
                    raw.trim().parse()
                }

                fn to_criteria_value(&self) -> CriteriaValue {
                    CriteriaValue::Text(self.as_str().to_string())
                }
            }
        )+
    };
}

enum_filter_value!(Size, OrderStatus, OrderItemStatus, Gender);

/// A filter descriptor for one field.
pub trait FieldFilter: Default + Debug + Clone + PartialEq + Send + Sync {
    /// Records one `operator=raw` pair, failing on malformed values.
    fn apply(&mut self, field: &str, operator: Operator, raw: &str) -> Result<(), CriteriaError>;

    /// Appends one predicate per set operator.
    fn collect(&self, field: &'static str, out: &mut Vec<FieldPredicate>);
}

fn invalid_value(field: &str, operator: Operator, raw: &str, message: String) -> CriteriaError {
    CriteriaError::InvalidValue {
        field: field.to_string(),
        operator: operator.as_str().to_string(),
        value: raw.to_string(),
        message,
    }
}

fn unsupported(field: &str, operator: Operator) -> CriteriaError {
    CriteriaError::UnsupportedOperator {
        field: field.to_string(),
        operator: operator.as_str().to_string(),
    }
}

fn parse_one<T: FilterValue>(field: &str, operator: Operator, raw: &str) -> Result<T, CriteriaError> {
    T::parse_filter_value(raw).map_err(|message| invalid_value(field, operator, raw, message))
}

fn parse_list<T: FilterValue>(
    field: &str,
    operator: Operator,
    raw: &str,
) -> Result<Vec<T>, CriteriaError> {
    raw.split(',')
        .map(|item| parse_one(field, operator, item))
        .collect()
}

fn parse_bool(field: &str, operator: Operator, raw: &str) -> Result<bool, CriteriaError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_value(
            field,
            operator,
            raw,
            "expected true or false".to_string(),
        )),
    }
}

/// Equality, set membership and null checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_list: Option<Vec<T>>,
    pub not_in: Option<Vec<T>>,
    pub specified: Option<bool>,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            not_in: None,
            specified: None,
        }
    }
}

impl<T: FilterValue> Filter<T> {
    /// A filter matching exactly `value`.
    pub fn equals(value: T) -> Self {
        Self {
            equals: Some(value),
            ..Self::default()
        }
    }

    /// A filter matching anything but `value`.
    pub fn not_equals(value: T) -> Self {
        Self {
            not_equals: Some(value),
            ..Self::default()
        }
    }

    /// A filter matching any of `values`.
    pub fn one_of(values: Vec<T>) -> Self {
        Self {
            in_list: Some(values),
            ..Self::default()
        }
    }

    /// A filter on whether the field is set.
    pub fn specified(specified: bool) -> Self {
        Self {
            specified: Some(specified),
            ..Self::default()
        }
    }
}

impl<T: FilterValue> FieldFilter for Filter<T> {
    fn apply(&mut self, field: &str, operator: Operator, raw: &str) -> Result<(), CriteriaError> {
        match operator {
            Operator::Equals => self.equals = Some(parse_one(field, operator, raw)?),
            Operator::NotEquals => self.not_equals = Some(parse_one(field, operator, raw)?),
            Operator::In => self.in_list = Some(parse_list(field, operator, raw)?),
            Operator::NotIn => self.not_in = Some(parse_list(field, operator, raw)?),
            Operator::Specified => self.specified = Some(parse_bool(field, operator, raw)?),
            _ => return Err(unsupported(field, operator)),
        }
        Ok(())
    }

    fn collect(&self, field: &'static str, out: &mut Vec<FieldPredicate>) {
        let mut push = |predicate| out.push(FieldPredicate { field, predicate });

        if let Some(value) = &self.equals {
            push(Predicate::Equals(value.to_criteria_value()));
        }
        if let Some(value) = &self.not_equals {
            push(Predicate::NotEquals(value.to_criteria_value()));
        }
        if let Some(values) = &self.in_list {
            push(Predicate::In(
                values.iter().map(FilterValue::to_criteria_value).collect(),
            ));
        }
        if let Some(values) = &self.not_in {
            push(Predicate::NotIn(
                values.iter().map(FilterValue::to_criteria_value).collect(),
            ));
        }
        match self.specified {
            Some(true) => push(Predicate::IsNotNull),
            Some(false) => push(Predicate::IsNull),
            None => {}
        }
    }
}

/// [`Filter`] plus ordered comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub filter: Filter<T>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    /// A range filter matching exactly `value`.
    pub fn equals(value: T) -> Self {
        Self {
            filter: Filter::equals(value),
            ..Self::default()
        }
    }

    /// Inclusive on both ends.
    pub fn between(low: T, high: T) -> Self {
        Self {
            greater_than_or_equal: Some(low),
            less_than_or_equal: Some(high),
            ..Self::default()
        }
    }
}

impl<T: FilterValue> FieldFilter for RangeFilter<T> {
    fn apply(&mut self, field: &str, operator: Operator, raw: &str) -> Result<(), CriteriaError> {
        match operator {
            Operator::GreaterThan => self.greater_than = Some(parse_one(field, operator, raw)?),
            Operator::GreaterThanOrEqual => {
                self.greater_than_or_equal = Some(parse_one(field, operator, raw)?)
            }
            Operator::LessThan => self.less_than = Some(parse_one(field, operator, raw)?),
            Operator::LessThanOrEqual => {
                self.less_than_or_equal = Some(parse_one(field, operator, raw)?)
            }
            _ => return self.filter.apply(field, operator, raw),
        }
        Ok(())
    }

    fn collect(&self, field: &'static str, out: &mut Vec<FieldPredicate>) {
        self.filter.collect(field, out);

        let bounds = [
            (&self.greater_than, Predicate::GreaterThan as fn(CriteriaValue) -> Predicate),
            (&self.greater_than_or_equal, Predicate::GreaterThanOrEqual),
            (&self.less_than, Predicate::LessThan),
            (&self.less_than_or_equal, Predicate::LessThanOrEqual),
        ];
        for (bound, make) in bounds {
            if let Some(value) = bound {
                out.push(FieldPredicate {
                    field,
                    predicate: make(value.to_criteria_value()),
                });
            }
        }
    }
}

/// [`Filter`] over text plus case-sensitive substring matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    pub filter: Filter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    /// A text filter matching exactly `value`.
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            filter: Filter::equals(value.into()),
            ..Self::default()
        }
    }

    /// A text filter matching values containing `needle`.
    pub fn contains(needle: impl Into<String>) -> Self {
        Self {
            contains: Some(needle.into()),
            ..Self::default()
        }
    }

    /// A text filter matching non-null values not containing `needle`.
    pub fn does_not_contain(needle: impl Into<String>) -> Self {
        Self {
            does_not_contain: Some(needle.into()),
            ..Self::default()
        }
    }
}

impl FieldFilter for StringFilter {
    fn apply(&mut self, field: &str, operator: Operator, raw: &str) -> Result<(), CriteriaError> {
        match operator {
            Operator::Contains => self.contains = Some(raw.to_string()),
            Operator::DoesNotContain => self.does_not_contain = Some(raw.to_string()),
            _ => return self.filter.apply(field, operator, raw),
        }
        Ok(())
    }

    fn collect(&self, field: &'static str, out: &mut Vec<FieldPredicate>) {
        self.filter.collect(field, out);
        if let Some(needle) = &self.contains {
            out.push(FieldPredicate {
                field,
                predicate: Predicate::Contains(needle.clone()),
            });
        }
        if let Some(needle) = &self.does_not_contain {
            out.push(FieldPredicate {
                field,
                predicate: Predicate::DoesNotContain(needle.clone()),
            });
        }
    }
}
