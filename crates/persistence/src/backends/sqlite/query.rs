//! SQL fragments and the criteria-to-predicate translation.
//!
//! A [`Specification`] is built once from a criteria object and then rendered
//! twice: as a paged `SELECT` and as a `COUNT`. Both renderings share the
//! same joins, the same `WHERE` clause and the same bound parameters, so a
//! page total always agrees with the count for the same criteria.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue};

use crate::criteria::{CriteriaValue, FieldPredicate, Predicate};
use crate::error::{CriteriaError, StorageResult};
use crate::types::{PageRequest, SortOrder};

use super::decimal;
use super::tables::SqliteTable;

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Blob parameter.
    Blob(Vec<u8>),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Creates a nullable string parameter.
    pub fn opt_string(s: Option<&str>) -> Self {
        s.map_or(SqlParam::Null, SqlParam::string)
    }

    /// Creates a nullable integer parameter.
    pub fn opt_integer(i: Option<i64>) -> Self {
        i.map_or(SqlParam::Null, SqlParam::Integer)
    }

    /// Converts a criteria operand. Decimals bind as their comparison key,
    /// matching how decimal columns are stored.
    fn from_criteria(value: &CriteriaValue) -> Self {
        match value {
            CriteriaValue::Integer(i) => SqlParam::Integer(*i),
            CriteriaValue::Decimal(d) => SqlParam::String(decimal::encode(d)),
            CriteriaValue::Text(s) => SqlParam::String(s.clone()),
            CriteriaValue::Instant(t) => SqlParam::String(CriteriaValue::instant_text(t)),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::String(s) => ToSqlOutput::from(s.as_str()),
            SqlParam::Integer(i) => ToSqlOutput::from(*i),
            SqlParam::Blob(b) => ToSqlOutput::from(b.as_slice()),
            SqlParam::Null => ToSqlOutput::Owned(SqlValue::Null),
        })
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter placeholder and returns the placeholder string.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns true if this fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Where a filterable field lives in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Expression compared by predicates, e.g. `oi.quantity` or `pc.id`.
    pub expr: &'static str,
    /// A one-to-many join this field needs beyond the table's base joins.
    pub join: Option<&'static str>,
}

impl Column {
    /// A column reachable through the base joins.
    pub const fn plain(expr: &'static str) -> Self {
        Self { expr, join: None }
    }

    /// A column on the far side of a one-to-many join.
    pub const fn to_many(expr: &'static str, join: &'static str) -> Self {
        Self {
            expr,
            join: Some(join),
        }
    }
}

/// A composed relational predicate for one entity table.
#[derive(Debug, Clone)]
pub struct Specification {
    joins: Vec<&'static str>,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    distinct: bool,
}

impl Specification {
    /// Translates ANDed field predicates into joins and conditions.
    pub fn build<T: SqliteTable>(predicates: &[FieldPredicate]) -> StorageResult<Self> {
        let mut joins: Vec<&'static str> = Vec::new();
        let mut where_clause = SqlFragment::default();
        let mut conditions = Vec::with_capacity(predicates.len());

        for FieldPredicate { field, predicate } in predicates {
            let column = T::column(field).ok_or_else(|| CriteriaError::UnknownField {
                field: field.to_string(),
            })?;
            if let Some(join) = column.join {
                if !joins.contains(&join) {
                    joins.push(join);
                }
            }
            conditions.push(condition(&mut where_clause, column.expr, predicate));
        }

        Ok(Self {
            distinct: !joins.is_empty(),
            joins,
            conditions,
            params: where_clause.params,
        })
    }

    /// Returns true if a one-to-many join may repeat rows.
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Bound parameters of the `WHERE` clause.
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    fn from_clause<T: SqliteTable>(&self) -> String {
        let mut sql = format!("FROM {} {}", T::TABLE, T::ALIAS);
        for join in T::BASE_JOINS.iter().chain(self.joins.iter()) {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        sql
    }

    /// Renders the row query, optionally limited to one page.
    pub fn select_sql<T: SqliteTable>(
        &self,
        sort: &[SortOrder],
        page: Option<&PageRequest>,
    ) -> StorageResult<String> {
        let mut sql = format!(
            "SELECT {}{} {} ORDER BY {}",
            if self.distinct { "DISTINCT " } else { "" },
            T::SELECT,
            self.from_clause::<T>(),
            order_by::<T>(sort)?
        );
        if let Some(page) = page {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", page.size, page.offset()));
        }
        Ok(sql)
    }

    /// Renders the count query.
    pub fn count_sql<T: SqliteTable>(&self) -> String {
        let counted = if self.distinct {
            format!("COUNT(DISTINCT {}.id)", T::ALIAS)
        } else {
            "COUNT(*)".to_string()
        };
        format!("SELECT {} {}", counted, self.from_clause::<T>())
    }
}

/// Renders sort keys with a final tie-break on id.
fn order_by<T: SqliteTable>(sort: &[SortOrder]) -> StorageResult<String> {
    let mut terms = Vec::with_capacity(sort.len() + 1);
    let mut has_id = false;
    for order in sort {
        let expr = T::sort_column(&order.property).ok_or_else(|| {
            CriteriaError::UnknownSortProperty {
                property: order.property.clone(),
            }
        })?;
        has_id |= order.property == "id";
        terms.push(format!("{} {}", expr, order.direction.as_sql()));
    }
    if !has_id {
        terms.push(format!("{}.id ASC", T::ALIAS));
    }
    Ok(terms.join(", "))
}

fn placeholders(fragment: &mut SqlFragment, values: &[CriteriaValue]) -> String {
    values
        .iter()
        .map(|v| fragment.add_param(SqlParam::from_criteria(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn compare(fragment: &mut SqlFragment, expr: &str, op: &str, value: &CriteriaValue) -> String {
    format!(
        "{} {} {}",
        expr,
        op,
        fragment.add_param(SqlParam::from_criteria(value))
    )
}

/// Renders one predicate against `expr`, binding its operands into `fragment`.
fn condition(fragment: &mut SqlFragment, expr: &str, predicate: &Predicate) -> String {
    match predicate {
        Predicate::Equals(v) => compare(fragment, expr, "=", v),
        Predicate::NotEquals(v) => compare(fragment, expr, "<>", v),
        Predicate::GreaterThan(v) => compare(fragment, expr, ">", v),
        Predicate::GreaterThanOrEqual(v) => compare(fragment, expr, ">=", v),
        Predicate::LessThan(v) => compare(fragment, expr, "<", v),
        Predicate::LessThanOrEqual(v) => compare(fragment, expr, "<=", v),
        Predicate::In(values) if values.is_empty() => "0".to_string(),
        Predicate::NotIn(values) if values.is_empty() => "1".to_string(),
        Predicate::In(values) => format!("{} IN ({})", expr, placeholders(fragment, values)),
        Predicate::NotIn(values) => {
            format!("{} NOT IN ({})", expr, placeholders(fragment, values))
        }
        Predicate::IsNull => format!("{} IS NULL", expr),
        Predicate::IsNotNull => format!("{} IS NOT NULL", expr),
        // instr() is case-sensitive and needs no LIKE escaping
        Predicate::Contains(needle) => format!(
            "instr({}, {}) > 0",
            expr,
            fragment.add_param(SqlParam::string(needle.as_str()))
        ),
        Predicate::DoesNotContain(needle) => format!(
            "({} IS NOT NULL AND instr({}, {}) = 0)",
            expr,
            expr,
            fragment.add_param(SqlParam::string(needle.as_str()))
        ),
    }
}
