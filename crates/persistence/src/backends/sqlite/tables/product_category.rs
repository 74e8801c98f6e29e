use rusqlite::Row;

use crate::backends::sqlite::query::{Column, SqlParam};
use crate::types::ProductCategory;

use super::SqliteTable;

impl SqliteTable for ProductCategory {
    const TABLE: &'static str = "product_category";
    const ALIAS: &'static str = "pc";
    const SELECT: &'static str = "pc.id, pc.name, pc.description";
    const BASE_JOINS: &'static [&'static str] = &[];
    const WRITE_COLUMNS: &'static [&'static str] = &["name", "description"];

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::plain("pc.id"),
            "name" => Column::plain("pc.name"),
            "description" => Column::plain("pc.description"),
            "productId" => Column::to_many(
                "pc_product.id",
                "LEFT JOIN product pc_product ON pc_product.product_category_id = pc.id",
            ),
            _ => return None,
        })
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        Some(match property {
            "id" => "pc.id",
            "name" => "pc.name",
            "description" => "pc.description",
            _ => return None,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }

    fn write_params(&self) -> Vec<SqlParam> {
        vec![
            SqlParam::string(self.name.as_str()),
            SqlParam::opt_string(self.description.as_deref()),
        ]
    }
}
