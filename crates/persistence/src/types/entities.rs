//! Persisted record shapes.
//!
//! Entities hold typed, validated field values. Many-to-one links are
//! [`Reference`]s carrying the referenced id and, when loaded from the store,
//! the referenced record's display field (a product's name, a customer's email).

// Entity fields mirror the data model one to one
#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::enums::{Gender, OrderItemStatus, OrderStatus, Size};

/// A many-to-one link to another record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The referenced record's id.
    pub id: i64,
    /// The referenced record's display field, when it was loaded.
    pub display: Option<String>,
}

impl Reference {
    /// A reference known only by id.
    pub fn to(id: i64) -> Self {
        Self { id, display: None }
    }

    /// A reference with its display field loaded.
    pub fn loaded(id: i64, display: Option<String>) -> Self {
        Self { id, display }
    }
}

/// A group of products.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCategory {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub size: Size,
    pub image: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    /// Display field: the category name.
    pub product_category: Option<Reference>,
}

/// A customer placing orders.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub country: String,
}

/// An order header. Its lines are [`OrderItem`]s pointing back at it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductOrder {
    pub id: Option<i64>,
    pub placed_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub code: String,
    pub invoice_id: Option<i64>,
    /// Display field: the customer email.
    pub customer: Option<Reference>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Option<i64>,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: OrderItemStatus,
    /// Display field: the product name.
    pub product: Option<Reference>,
    /// Display field: the order code.
    pub order: Option<Reference>,
}
