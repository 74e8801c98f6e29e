use rusqlite::Row;

use crate::backends::sqlite::query::{Column, SqlParam};
use crate::types::Product;

use super::{SqliteTable, decimal_at, decimal_param, enum_at, reference_at, reference_param};

impl SqliteTable for Product {
    const TABLE: &'static str = "product";
    const ALIAS: &'static str = "p";
    const SELECT: &'static str = "p.id, p.name, p.description, p.price, p.size, p.image, \
                                  p.image_content_type, p.product_category_id, pc.name";
    const BASE_JOINS: &'static [&'static str] =
        &["LEFT JOIN product_category pc ON pc.id = p.product_category_id"];
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "price",
        "size",
        "image",
        "image_content_type",
        "product_category_id",
    ];

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::plain("p.id"),
            "name" => Column::plain("p.name"),
            "description" => Column::plain("p.description"),
            "price" => Column::plain("p.price"),
            "size" => Column::plain("p.size"),
            "productCategoryId" => Column::plain("pc.id"),
            _ => return None,
        })
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        Some(match property {
            "id" => "p.id",
            "name" => "p.name",
            "description" => "p.description",
            "price" => "p.price",
            "size" => "p.size",
            "imageContentType" => "p.image_content_type",
            "productCategory.name" => "pc.name",
            _ => return None,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            price: decimal_at(row, 3)?,
            size: enum_at(row, 4)?,
            image: row.get(5)?,
            image_content_type: row.get(6)?,
            product_category: reference_at(row, 7, 8)?,
        })
    }

    fn write_params(&self) -> Vec<SqlParam> {
        vec![
            SqlParam::string(self.name.as_str()),
            SqlParam::opt_string(self.description.as_deref()),
            decimal_param(&self.price),
            SqlParam::string(self.size.as_str()),
            self.image.clone().map_or(SqlParam::Null, SqlParam::Blob),
            SqlParam::opt_string(self.image_content_type.as_deref()),
            reference_param(&self.product_category),
        ]
    }
}
