use rusqlite::Row;

use crate::backends::sqlite::query::{Column, SqlParam};
use crate::types::OrderItem;

use super::{SqliteTable, decimal_at, decimal_param, enum_at, reference_at, reference_param};

impl SqliteTable for OrderItem {
    const TABLE: &'static str = "order_item";
    const ALIAS: &'static str = "oi";
    const SELECT: &'static str =
        "oi.id, oi.quantity, oi.total_price, oi.status, oi.product_id, oi.order_id, p.name, po.code";
    const BASE_JOINS: &'static [&'static str] = &[
        "LEFT JOIN product p ON p.id = oi.product_id",
        "LEFT JOIN product_order po ON po.id = oi.order_id",
    ];
    const WRITE_COLUMNS: &'static [&'static str] =
        &["quantity", "total_price", "status", "product_id", "order_id"];

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::plain("oi.id"),
            "quantity" => Column::plain("oi.quantity"),
            "totalPrice" => Column::plain("oi.total_price"),
            "status" => Column::plain("oi.status"),
            "productId" => Column::plain("p.id"),
            "orderId" => Column::plain("po.id"),
            _ => return None,
        })
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        Some(match property {
            "id" => "oi.id",
            "quantity" => "oi.quantity",
            "totalPrice" => "oi.total_price",
            "status" => "oi.status",
            "product.name" => "p.name",
            "order.code" => "po.code",
            _ => return None,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            quantity: row.get(1)?,
            total_price: decimal_at(row, 2)?,
            status: enum_at(row, 3)?,
            product: reference_at(row, 4, 6)?,
            order: reference_at(row, 5, 7)?,
        })
    }

    fn write_params(&self) -> Vec<SqlParam> {
        vec![
            SqlParam::Integer(i64::from(self.quantity)),
            decimal_param(&self.total_price),
            SqlParam::string(self.status.as_str()),
            reference_param(&self.product),
            reference_param(&self.order),
        ]
    }
}
