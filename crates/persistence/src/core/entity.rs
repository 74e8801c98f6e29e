//! The [`Entity`] trait tying a record type to its transport shape,
//! criteria and index.

use std::fmt::Debug;

use crate::criteria::{
    Criteria, CustomerCriteria, OrderItemCriteria, ProductCategoryCriteria, ProductCriteria,
    ProductOrderCriteria,
};
use crate::error::ValidationError;
use crate::types::{
    Customer, CustomerDto, Dto, OrderItem, OrderItemDto, Product, ProductCategory,
    ProductCategoryDto, ProductDto, ProductOrder, ProductOrderDto,
};

/// A persisted record type.
///
/// Every entity is stored in the relational store under an integer id and
/// mirrored into the search index as its [`Entity::Dto`] JSON.
pub trait Entity: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The transport shape. Converting to it is total; converting back validates.
    type Dto: Dto + for<'a> From<&'a Self> + TryInto<Self, Error = ValidationError>;

    /// The filter set accepted by structured queries.
    type Criteria: Criteria;

    /// Display name used in errors and logs (e.g. `OrderItem`).
    const NAME: &'static str;

    /// Search index name (e.g. `orderitem`).
    const INDEX: &'static str;

    /// Returns the id, or `None` for a record that was never stored.
    fn id(&self) -> Option<i64>;

    /// Returns the same record with the given id.
    fn with_id(self, id: i64) -> Self;
}

macro_rules! impl_entity {
    ($entity:ty, $dto:ty, $criteria:ty, $name:literal, $index:literal) => {
        impl Entity for $entity {
            type Dto = $dto;
            type Criteria = $criteria;

            const NAME: &'static str = $name;
            const INDEX: &'static str = $index;

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn with_id(mut self, id: i64) -> Self {
                self.id = Some(id);
                self
            }
        }
    };
}

impl_entity!(
    ProductCategory,
    ProductCategoryDto,
    ProductCategoryCriteria,
    "ProductCategory",
    "productcategory"
);
impl_entity!(Product, ProductDto, ProductCriteria, "Product", "product");
impl_entity!(Customer, CustomerDto, CustomerCriteria, "Customer", "customer");
impl_entity!(
    ProductOrder,
    ProductOrderDto,
    ProductOrderCriteria,
    "ProductOrder",
    "productorder"
);
impl_entity!(OrderItem, OrderItemDto, OrderItemCriteria, "OrderItem", "orderitem");
