//! Valid DTOs for each entity.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use storefront_persistence::service::Services;
use storefront_persistence::types::{
    CustomerDto, Gender, OrderItemDto, OrderItemStatus, OrderStatus, ProductCategoryDto,
    ProductDto, ProductOrderDto, Size,
};

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0)
        .single()
        .expect("valid date")
}

pub fn category(name: &str) -> ProductCategoryDto {
    ProductCategoryDto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn product(name: &str, price: Decimal, size: Size, category_id: Option<i64>) -> ProductDto {
    ProductDto {
        name: Some(name.to_string()),
        price: Some(price),
        size: Some(size),
        product_category_id: category_id,
        ..Default::default()
    }
}

pub fn customer(first_name: &str, email: &str) -> CustomerDto {
    CustomerDto {
        first_name: Some(first_name.to_string()),
        last_name: Some("Tester".to_string()),
        gender: Some(Gender::Other),
        email: Some(email.to_string()),
        phone: Some("+1 555 0100".to_string()),
        address_line1: Some("1 Main Street".to_string()),
        city: Some("Springfield".to_string()),
        country: Some("USA".to_string()),
        ..Default::default()
    }
}

pub fn order(code: &str, day: u32, status: OrderStatus, customer_id: Option<i64>) -> ProductOrderDto {
    ProductOrderDto {
        placed_date: Some(at(day)),
        status: Some(status),
        code: Some(code.to_string()),
        customer_id,
        ..Default::default()
    }
}

pub fn item(
    quantity: i32,
    total_price: Decimal,
    product_id: Option<i64>,
    order_id: Option<i64>,
) -> OrderItemDto {
    OrderItemDto {
        quantity: Some(quantity),
        total_price: Some(total_price),
        status: Some(OrderItemStatus::Available),
        product_id,
        order_id,
        ..Default::default()
    }
}

/// Ids of a small catalogue: two categories, three products, one customer,
/// two orders and three order items.
#[derive(Debug, Clone, Copy)]
pub struct Catalogue {
    pub shirts: i64,
    pub hats: i64,
    pub oxford: i64,
    pub polo: i64,
    pub beanie: i64,
    pub ada: i64,
    pub first_order: i64,
    pub second_order: i64,
}

fn saved(id: Option<i64>) -> i64 {
    id.expect("saved record has an id")
}

pub async fn seed_catalogue(services: &Services) -> Catalogue {
    let shirts = saved(services.product_categories.save(category("Shirts")).await.unwrap().id);
    let hats = saved(services.product_categories.save(category("Hats")).await.unwrap().id);

    let oxford = saved(
        services
            .products
            .save(product("Oxford Shirt", Decimal::new(4500, 2), Size::L, Some(shirts)))
            .await
            .unwrap()
            .id,
    );
    let polo = saved(
        services
            .products
            .save(product("Polo Shirt", Decimal::new(2500, 2), Size::M, Some(shirts)))
            .await
            .unwrap()
            .id,
    );
    let beanie = saved(
        services
            .products
            .save(product("Beanie", Decimal::new(1200, 2), Size::S, Some(hats)))
            .await
            .unwrap()
            .id,
    );

    let ada = saved(
        services
            .customers
            .save(customer("Ada", "ada@example.com"))
            .await
            .unwrap()
            .id,
    );

    let first_order = saved(
        services
            .product_orders
            .save(order("ORD-1", 1, OrderStatus::Completed, Some(ada)))
            .await
            .unwrap()
            .id,
    );
    let second_order = saved(
        services
            .product_orders
            .save(order("ORD-2", 5, OrderStatus::Pending, None))
            .await
            .unwrap()
            .id,
    );

    for dto in [
        item(2, Decimal::new(9000, 2), Some(oxford), Some(first_order)),
        item(1, Decimal::new(1200, 2), Some(beanie), Some(first_order)),
        item(3, Decimal::new(7500, 2), Some(polo), Some(second_order)),
    ] {
        services.order_items.save(dto).await.unwrap();
    }

    Catalogue {
        shirts,
        hats,
        oxford,
        polo,
        beanie,
        ada,
        first_order,
        second_order,
    }
}
