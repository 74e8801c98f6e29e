use rusqlite::Row;

use crate::backends::sqlite::query::{Column, SqlParam};
use crate::types::Customer;

use super::{SqliteTable, enum_at};

impl SqliteTable for Customer {
    const TABLE: &'static str = "customer";
    const ALIAS: &'static str = "c";
    const SELECT: &'static str = "c.id, c.first_name, c.last_name, c.gender, c.email, c.phone, \
                                  c.address_line1, c.address_line2, c.city, c.country";
    const BASE_JOINS: &'static [&'static str] = &[];
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "gender",
        "email",
        "phone",
        "address_line1",
        "address_line2",
        "city",
        "country",
    ];

    fn column(field: &str) -> Option<Column> {
        Some(match field {
            "id" => Column::plain("c.id"),
            "firstName" => Column::plain("c.first_name"),
            "lastName" => Column::plain("c.last_name"),
            "gender" => Column::plain("c.gender"),
            "email" => Column::plain("c.email"),
            "phone" => Column::plain("c.phone"),
            "city" => Column::plain("c.city"),
            "country" => Column::plain("c.country"),
            "orderId" => Column::to_many(
                "c_order.id",
                "LEFT JOIN product_order c_order ON c_order.customer_id = c.id",
            ),
            _ => return None,
        })
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        Some(match property {
            "id" => "c.id",
            "firstName" => "c.first_name",
            "lastName" => "c.last_name",
            "gender" => "c.gender",
            "email" => "c.email",
            "phone" => "c.phone",
            "addressLine1" => "c.address_line1",
            "addressLine2" => "c.address_line2",
            "city" => "c.city",
            "country" => "c.country",
            _ => return None,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            gender: enum_at(row, 3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            address_line1: row.get(6)?,
            address_line2: row.get(7)?,
            city: row.get(8)?,
            country: row.get(9)?,
        })
    }

    fn write_params(&self) -> Vec<SqlParam> {
        vec![
            SqlParam::string(self.first_name.as_str()),
            SqlParam::string(self.last_name.as_str()),
            SqlParam::string(self.gender.as_str()),
            SqlParam::string(self.email.as_str()),
            SqlParam::string(self.phone.as_str()),
            SqlParam::string(self.address_line1.as_str()),
            SqlParam::opt_string(self.address_line2.as_deref()),
            SqlParam::string(self.city.as_str()),
            SqlParam::string(self.country.as_str()),
        ]
    }
}
