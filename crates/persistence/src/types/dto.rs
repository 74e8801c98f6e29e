//! Transport shapes.
//!
//! DTOs are what the API reads and writes and what the search index stores.
//! Required fields are still `Option` here so that an absent value can be
//! reported as a validation error instead of a deserialization failure.
//! Referenced records are flattened into `<reference>Id` plus a display field.

// DTO fields are named after their camelCase wire keys
#![allow(missing_docs)]

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::enums::{Gender, OrderItemStatus, OrderStatus, Size};

/// Common behavior of all transport shapes.
pub trait Dto: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Returns the record id, if the DTO carries one.
    fn id(&self) -> Option<i64>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default, with = "base64_bytes")]
    pub image: Option<Vec<u8>>,
    #[serde(default)]
    pub image_content_type: Option<String>,
    #[serde(default)]
    pub product_category_id: Option<i64>,
    #[serde(default)]
    pub product_category_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrderDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub placed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<OrderItemStatus>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub order_code: Option<String>,
}

macro_rules! impl_dto {
    ($($dto:ty),+ $(,)?) => {
        $(
            impl Dto for $dto {
                fn id(&self) -> Option<i64> {
                    self.id
                }
            }
        )+
    };
}

impl_dto!(
    ProductCategoryDto,
    ProductDto,
    CustomerDto,
    ProductOrderDto,
    OrderItemDto,
);

/// Serde adapter for optional binary fields, encoded as standard base64.
mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
