//! JSON request bodies.

use serde_json::{Value, json};

use super::harness::TestApp;

pub const CATEGORIES: &str = "/api/product-categories";
pub const PRODUCTS: &str = "/api/products";
pub const CUSTOMERS: &str = "/api/customers";
pub const ORDERS: &str = "/api/product-orders";
pub const ITEMS: &str = "/api/order-items";

pub fn category(name: &str) -> Value {
    json!({ "name": name, "description": format!("All {}", name.to_lowercase()) })
}

pub fn product(name: &str, price: f64, size: &str, category_id: Option<i64>) -> Value {
    json!({
        "name": name,
        "price": price,
        "size": size,
        "productCategoryId": category_id,
    })
}

pub fn customer(first_name: &str, email: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Tester",
        "gender": "OTHER",
        "email": email,
        "phone": "+1 555 0100",
        "addressLine1": "1 Main Street",
        "city": "Springfield",
        "country": "USA",
    })
}

pub fn order(code: &str, day: u32, status: &str, customer_id: Option<i64>) -> Value {
    json!({
        "placedDate": format!("2024-03-{:02}T12:00:00Z", day),
        "status": status,
        "code": code,
        "customerId": customer_id,
    })
}

pub fn item(quantity: Option<i32>, total: f64, product_id: i64, order_id: i64) -> Value {
    json!({
        "quantity": quantity,
        "totalPrice": total,
        "status": "AVAILABLE",
        "productId": product_id,
        "orderId": order_id,
    })
}

/// Ids of the seeded catalogue.
#[derive(Debug, Clone, Copy)]
pub struct Catalogue {
    pub shirts: i64,
    pub hats: i64,
    pub oxford: i64,
    pub polo: i64,
    pub beanie: i64,
    pub ada: i64,
    pub completed_order: i64,
    pub pending_order: i64,
}

/// Seeds two categories, three products, a customer and two orders.
pub async fn seed_catalogue(app: &TestApp) -> Catalogue {
    let shirts = app.create_id(CATEGORIES, category("Shirts")).await;
    let hats = app.create_id(CATEGORIES, category("Hats")).await;

    let oxford = app
        .create_id(PRODUCTS, product("Oxford Shirt", 45.0, "L", Some(shirts)))
        .await;
    let polo = app
        .create_id(PRODUCTS, product("Polo Shirt", 25.0, "M", Some(shirts)))
        .await;
    let beanie = app
        .create_id(PRODUCTS, product("Beanie", 12.0, "S", Some(hats)))
        .await;

    let ada = app
        .create_id(CUSTOMERS, customer("Ada", "ada@example.com"))
        .await;
    let completed_order = app
        .create_id(ORDERS, order("ORD-1", 1, "COMPLETED", Some(ada)))
        .await;
    let pending_order = app
        .create_id(ORDERS, order("ORD-2", 5, "PENDING", None))
        .await;

    Catalogue {
        shirts,
        hats,
        oxford,
        polo,
        beanie,
        ada,
        completed_order,
        pending_order,
    }
}
