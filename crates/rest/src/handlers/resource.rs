//! Binds each entity to its URL path and service.

use storefront_persistence::core::Entity;
use storefront_persistence::service::{EntityService, Services};
use storefront_persistence::types::{Customer, OrderItem, Product, ProductCategory, ProductOrder};

use crate::error::{RestError, RestResult, alert_name};

/// An entity exposed under `/api/{PATH}`.
pub trait ApiEntity: Entity {
    /// Plural, kebab-case path segment, e.g. `product-orders`.
    const PATH: &'static str;

    /// Returns the entity's service.
    fn service(services: &Services) -> &EntityService<Self>;

    /// Name used in alert headers and problem documents, e.g. `productOrder`.
    fn alert_name() -> String {
        alert_name(Self::NAME)
    }
}

impl ApiEntity for ProductCategory {
    const PATH: &'static str = "product-categories";

    fn service(services: &Services) -> &EntityService<Self> {
        &services.product_categories
    }
}

impl ApiEntity for Product {
    const PATH: &'static str = "products";

    fn service(services: &Services) -> &EntityService<Self> {
        &services.products
    }
}

impl ApiEntity for Customer {
    const PATH: &'static str = "customers";

    fn service(services: &Services) -> &EntityService<Self> {
        &services.customers
    }
}

impl ApiEntity for ProductOrder {
    const PATH: &'static str = "product-orders";

    fn service(services: &Services) -> &EntityService<Self> {
        &services.product_orders
    }
}

impl ApiEntity for OrderItem {
    const PATH: &'static str = "order-items";

    fn service(services: &Services) -> &EntityService<Self> {
        &services.order_items
    }
}

/// Parses an `{id}` path segment.
pub fn parse_id<E: ApiEntity>(raw: &str) -> RestResult<i64> {
    raw.parse().map_err(|_| RestError::BadRequest {
        message: format!("Invalid {} id '{}'", E::alert_name(), raw),
    })
}
