//! Row mappings for each entity table.

mod customer;
mod order_item;
mod product;
mod product_category;
mod product_order;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

use crate::core::Entity;
use crate::types::Reference;

use super::decimal;
use super::query::{Column, SqlParam};

/// How an entity maps onto its SQLite table.
///
/// `SELECT` lists the table's own columns in `WRITE_COLUMNS` order after `id`,
/// followed by the display columns of the base joins; `from_row` reads them
/// back in that order.
pub trait SqliteTable: Entity {
    /// Table name.
    const TABLE: &'static str;
    /// Alias used for the table in every query.
    const ALIAS: &'static str;
    /// Selected columns.
    const SELECT: &'static str;
    /// Many-to-one `LEFT JOIN`s that load display fields.
    const BASE_JOINS: &'static [&'static str];
    /// Columns written by insert and update, excluding `id`.
    const WRITE_COLUMNS: &'static [&'static str];

    /// Resolves a criteria field name.
    fn column(field: &str) -> Option<Column>;

    /// Resolves a sort property name.
    fn sort_column(property: &str) -> Option<&'static str>;

    /// Reads one selected row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Values for `WRITE_COLUMNS`, in order.
    fn write_params(&self) -> Vec<SqlParam>;
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let key: String = row.get(idx)?;
    decimal::decode(&key).map_err(|message| conversion_error(idx, message))
}

fn instant_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e.to_string()))
}

fn enum_at<T: FromStr<Err = String>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    text.parse().map_err(|message| conversion_error(idx, message))
}

fn reference_at(
    row: &Row<'_>,
    id_idx: usize,
    display_idx: usize,
) -> rusqlite::Result<Option<Reference>> {
    let id: Option<i64> = row.get(id_idx)?;
    let display: Option<String> = row.get(display_idx)?;
    Ok(id.map(|id| Reference::loaded(id, display)))
}

fn reference_param(reference: &Option<Reference>) -> SqlParam {
    SqlParam::opt_integer(reference.as_ref().map(|r| r.id))
}

fn decimal_param(value: &Decimal) -> SqlParam {
    SqlParam::string(decimal::encode(value))
}
