//! Create, update, read and delete over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::fixtures::*;
use common::harness::{TestApp, header};

#[tokio::test]
async fn create_returns_location_and_alert() {
    let app = TestApp::new();

    let response = app.server.post(CATEGORIES).json(&category("Shirts")).await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    let id = body["id"].as_i64().expect("id assigned");
    assert_eq!(body["name"], "Shirts");

    assert_eq!(
        header(&response, "location"),
        format!("http://localhost/api/product-categories/{}", id)
    );
    assert_eq!(
        header(&response, "x-storefront-alert"),
        "storefrontApp.productCategory.created"
    );
    assert_eq!(header(&response, "x-storefront-params"), id.to_string());
}

#[tokio::test]
async fn create_with_id_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .post(ORDERS)
        .json(&json!({
            "id": 7,
            "placedDate": "2024-03-01T12:00:00Z",
            "status": "PENDING",
            "code": "ORD-7",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        header(&response, "content-type"),
        "application/problem+json"
    );
    let problem = response.json::<Value>();
    assert_eq!(problem["errorKey"], "idexists");
    assert_eq!(problem["entityName"], "productOrder");
    assert_eq!(problem["status"], 400);
    assert_eq!(app.count(ORDERS).await, 0);
}

#[tokio::test]
async fn update_round_trip() {
    let app = TestApp::new();
    let mut created = app.create(CATEGORIES, category("Shirts")).await;
    let id = created["id"].as_i64().unwrap();

    created["name"] = json!("Tops");
    let response = app.server.put(CATEGORIES).json(&created).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Tops");
    assert_eq!(
        header(&response, "x-storefront-alert"),
        "storefrontApp.productCategory.updated"
    );
    assert_eq!(header(&response, "x-storefront-params"), id.to_string());

    let fetched = app
        .server
        .get(&format!("{}/{}", CATEGORIES, id))
        .await
        .json::<Value>();
    assert_eq!(fetched["name"], "Tops");
}

#[tokio::test]
async fn update_without_id_is_rejected() {
    let app = TestApp::new();

    let response = app.server.put(CATEGORIES).json(&category("Shirts")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errorKey"], "idnull");
}

#[tokio::test]
async fn update_of_absent_record_is_not_found() {
    let app = TestApp::new();

    let response = app
        .server
        .put(CATEGORIES)
        .json(&json!({ "id": 4242, "name": "Ghost" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["errorKey"], "notfound");
}

#[tokio::test]
async fn read_missing_and_malformed_ids() {
    let app = TestApp::new();

    let missing = app.server.get(&format!("{}/999", PRODUCTS)).await;
    missing.assert_status(StatusCode::NOT_FOUND);
    let problem = missing.json::<Value>();
    assert_eq!(problem["errorKey"], "notfound");
    assert_eq!(problem["title"], "Not Found");

    let malformed = app.server.get(&format!("{}/abc", PRODUCTS)).await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_then_read_is_not_found() {
    let app = TestApp::new();
    let id = app.create_id(CUSTOMERS, customer("Ada", "ada@example.com")).await;

    let response = app.server.delete(&format!("{}/{}", CUSTOMERS, id)).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(
        header(&response, "x-storefront-alert"),
        "storefrontApp.customer.deleted"
    );
    app.server
        .get(&format!("{}/{}", CUSTOMERS, id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_absent_record_is_not_found() {
    let app = TestApp::new();

    let response = app.server.delete(&format!("{}/31337", ORDERS)).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.headers().get("x-storefront-alert").is_none());
}

#[tokio::test]
async fn missing_required_fields_report_field_errors() {
    let app = TestApp::new();
    let catalogue = seed_catalogue(&app).await;

    let response = app
        .server
        .post(ITEMS)
        .json(&item(None, 10.0, catalogue.polo, catalogue.pending_order))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let problem = response.json::<Value>();
    assert_eq!(problem["errorKey"], "validation");
    assert_eq!(
        problem["type"],
        "https://www.storefront.dev/problem/constraint-violation"
    );
    let fields: Vec<&str> = problem["fieldErrors"]
        .as_array()
        .expect("field errors present")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["quantity"]);
    assert_eq!(problem["fieldErrors"][0]["objectName"], "OrderItem");
}

#[tokio::test]
async fn zero_quantity_is_accepted() {
    let app = TestApp::new();
    let catalogue = seed_catalogue(&app).await;

    let created = app
        .create(
            ITEMS,
            item(Some(0), 0.0, catalogue.polo, catalogue.pending_order),
        )
        .await;

    assert_eq!(created["quantity"], 0);
    assert_eq!(created["productName"], "Polo Shirt");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .post(CUSTOMERS)
        .json(&customer("Ada", "not-an-email"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let problem = response.json::<Value>();
    assert_eq!(problem["errorKey"], "validation");
    assert_eq!(problem["fieldErrors"][0]["field"], "email");
}

#[tokio::test]
async fn dangling_reference_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .post(PRODUCTS)
        .json(&product("Orphan", 9.0, "M", Some(9999)))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errorKey"], "invalidreference");
    assert_eq!(app.count(PRODUCTS).await, 0);
}

#[tokio::test]
async fn deleting_a_referenced_record_conflicts() {
    let app = TestApp::new();
    let catalogue = seed_catalogue(&app).await;

    let response = app
        .server
        .delete(&format!("{}/{}", CATEGORIES, catalogue.shirts))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["errorKey"], "inuse");
    app.server
        .get(&format!("{}/{}", CATEGORIES, catalogue.shirts))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn product_carries_its_category_name() {
    let app = TestApp::new();
    let catalogue = seed_catalogue(&app).await;

    let product = app
        .server
        .get(&format!("{}/{}", PRODUCTS, catalogue.beanie))
        .await
        .json::<Value>();

    assert_eq!(product["productCategoryId"], catalogue.hats);
    assert_eq!(product["productCategoryName"], "Hats");
    assert_eq!(product["size"], "S");
    assert_eq!(product["price"], 12.0);
}

#[tokio::test]
async fn non_json_body_is_unsupported() {
    let app = TestApp::new();

    let response = app.server.post(CATEGORIES).text("name=Shirts").await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        response.json::<Value>()["errorKey"],
        "unsupportedmediatype"
    );
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();

    let response = app
        .server
        .post(CATEGORIES)
        .bytes("{\"name\": ".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errorKey"], "badrequest");
}
