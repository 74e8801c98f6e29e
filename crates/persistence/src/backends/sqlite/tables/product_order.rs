use rusqlite::Row;

use crate::backends::sqlite::query::{Column, SqlParam};
use crate::criteria::CriteriaValue;
use crate::types::ProductOrder;

use super::{SqliteTable, enum_at, instant_at, reference_at, reference_param};

impl SqliteTable for ProductOrder {
    const TABLE: &'static str = "product_order";
    const ALIAS: &'static str = "po";
    const SELECT: &'static str =
        "po.id, po.placed_date, po.status, po.code, po.invoice_id, po.customer_id, c.email";
    const BASE_JOINS: &'static [&'static str] = &["LEFT JOIN customer c ON c.id = po.customer_id"];
    const WRITE_COLUMNS: &'static [&'static str] =
        &["placed_date", "status", "code", "invoice_id", "customer_id"];

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::plain("po.id"),
            "placedDate" => Column::plain("po.placed_date"),
            "status" => Column::plain("po.status"),
            "code" => Column::plain("po.code"),
            "invoiceId" => Column::plain("po.invoice_id"),
            "customerId" => Column::plain("c.id"),
            "orderItemId" => Column::to_many(
                "po_item.id",
                "LEFT JOIN order_item po_item ON po_item.order_id = po.id",
            ),
            _ => return None,
        })
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        Some(match property {
            "id" => "po.id",
            "placedDate" => "po.placed_date",
            "status" => "po.status",
            "code" => "po.code",
            "invoiceId" => "po.invoice_id",
            "customer.email" => "c.email",
            _ => return None,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            placed_date: instant_at(row, 1)?,
            status: enum_at(row, 2)?,
            code: row.get(3)?,
            invoice_id: row.get(4)?,
            customer: reference_at(row, 5, 6)?,
        })
    }

    fn write_params(&self) -> Vec<SqlParam> {
        vec![
            SqlParam::string(CriteriaValue::instant_text(&self.placed_date)),
            SqlParam::string(self.status.as_str()),
            SqlParam::string(self.code.as_str()),
            SqlParam::opt_integer(self.invoice_id),
            reference_param(&self.customer),
        ]
    }
}
