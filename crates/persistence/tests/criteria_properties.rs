//! Criteria query properties, checked against a seeded SQLite store.

mod common;

use std::collections::BTreeSet;

use common::*;
use rust_decimal::Decimal;
use storefront_persistence::criteria::{
    Criteria, CustomerCriteria, OrderItemCriteria, ProductCategoryCriteria, ProductCriteria,
    ProductOrderCriteria,
};
use storefront_persistence::error::{CriteriaError, StorageError};
use storefront_persistence::types::{Direction, OrderStatus, PageRequest, Size};

fn ids<T>(records: &[T], id: impl Fn(&T) -> Option<i64>) -> BTreeSet<i64> {
    records.iter().filter_map(id).collect()
}

#[tokio::test]
async fn test_empty_criteria_matches_find_all() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let all = services.products.find_all(&PageRequest::default()).await.unwrap();
    let filtered = services
        .products
        .find_by_criteria(&ProductCriteria::default(), &PageRequest::default())
        .await
        .unwrap();

    assert_eq!(all, filtered);
    assert_eq!(all.total_elements, 3);
    assert_eq!(
        services
            .products
            .count_by_criteria(&ProductCriteria::default())
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn test_equals_and_not_equals_partition() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let equals = ProductCriteria::from_pairs([("size.equals", "M")]).unwrap();
    let not_equals = ProductCriteria::from_pairs([("size.notEquals", "M")]).unwrap();

    let matched = services.products.find_list_by_criteria(&equals, &[]).await.unwrap();
    let rest = services
        .products
        .find_list_by_criteria(&not_equals, &[])
        .await
        .unwrap();

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name.as_deref(), Some("Polo Shirt"));
    let matched_ids = ids(&matched, |p| p.id);
    let rest_ids = ids(&rest, |p| p.id);
    assert!(matched_ids.is_disjoint(&rest_ids));
    assert_eq!(matched_ids.len() + rest_ids.len(), 3);
}

#[tokio::test]
async fn test_range_bounds_are_inclusive() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let criteria = ProductCriteria::from_pairs([
        ("price.greaterThanOrEqual", "12.00"),
        ("price.lessThanOrEqual", "25"),
    ])
    .unwrap();
    let names: BTreeSet<_> = services
        .products
        .find_list_by_criteria(&criteria, &[])
        .await
        .unwrap()
        .into_iter()
        .filter_map(|p| p.name)
        .collect();
    assert_eq!(
        names,
        BTreeSet::from(["Beanie".to_string(), "Polo Shirt".to_string()])
    );

    let strict = ProductCriteria::from_pairs([
        ("price.greaterThan", "12.00"),
        ("price.lessThan", "25"),
    ])
    .unwrap();
    assert_eq!(services.products.count_by_criteria(&strict).await.unwrap(), 0);
}

#[tokio::test]
async fn test_decimal_comparison_is_numeric() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    // "9" sorts after "45.00" as text but is smaller as a number
    let criteria = ProductCriteria::from_pairs([("price.greaterThan", "9")]).unwrap();
    assert_eq!(services.products.count_by_criteria(&criteria).await.unwrap(), 3);
}

#[tokio::test]
async fn test_decimal_equality_is_exact_beyond_float_precision() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;
    for (name, cents) in [("Gold Shirt", 123456789012345601), ("Platinum Shirt", 123456789012345602)] {
        services
            .products
            .save(product(name, Decimal::new(cents, 2), Size::L, None))
            .await
            .unwrap();
    }

    let equals = ProductCriteria::from_pairs([("price.equals", "1234567890123456.01")]).unwrap();
    let not_equals =
        ProductCriteria::from_pairs([("price.notEquals", "1234567890123456.01")]).unwrap();
    let matched = services.products.find_list_by_criteria(&equals, &[]).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name.as_deref(), Some("Gold Shirt"));
    assert_eq!(matched[0].price, Some(Decimal::new(123456789012345601, 2)));
    assert_eq!(services.products.count_by_criteria(&not_equals).await.unwrap(), 4);

    let above = ProductCriteria::from_pairs([("price.greaterThan", "1234567890123456.01")]).unwrap();
    let above = services.products.find_list_by_criteria(&above, &[]).await.unwrap();
    assert_eq!(above.len(), 1);
    assert_eq!(above[0].name.as_deref(), Some("Platinum Shirt"));

    let by_price = services
        .products
        .find_all(&PageRequest::default().with_sort("price", Direction::Desc))
        .await
        .unwrap();
    let names: Vec<_> = by_price.content.iter().filter_map(|p| p.name.as_deref()).collect();
    assert_eq!(
        names,
        vec!["Platinum Shirt", "Gold Shirt", "Oxford Shirt", "Polo Shirt", "Beanie"]
    );
}

#[tokio::test]
async fn test_instant_range() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let criteria =
        ProductOrderCriteria::from_pairs([("placedDate.greaterThan", "2024-03-02T00:00:00Z")])
            .unwrap();
    let orders = services
        .product_orders
        .find_list_by_criteria(&criteria, &[])
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].code.as_deref(), Some("ORD-2"));
    assert_eq!(orders[0].placed_date, Some(at(5)));
}

#[tokio::test]
async fn test_instant_bounds_keep_sub_millisecond_precision() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let after_first = ProductOrderCriteria::from_pairs([(
        "placedDate.greaterThanOrEqual",
        "2024-03-01T12:00:00.000500Z",
    )])
    .unwrap();
    let orders = services
        .product_orders
        .find_list_by_criteria(&after_first, &[])
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].code.as_deref(), Some("ORD-2"));

    let mut late = order("ORD-3", 1, OrderStatus::Pending, None);
    late.placed_date = Some(at(1) + chrono::Duration::microseconds(500));
    services.product_orders.save(late).await.unwrap();

    let exact = ProductOrderCriteria::from_pairs([(
        "placedDate.equals",
        "2024-03-01T12:00:00.000500Z",
    )])
    .unwrap();
    let orders = services
        .product_orders
        .find_list_by_criteria(&exact, &[])
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].code.as_deref(), Some("ORD-3"));
    assert_eq!(
        orders[0].placed_date,
        Some(at(1) + chrono::Duration::microseconds(500))
    );
}

#[tokio::test]
async fn test_contains_and_does_not_contain_are_complements() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let contains = ProductCriteria::from_pairs([("name.contains", "Shirt")]).unwrap();
    let lacks = ProductCriteria::from_pairs([("name.doesNotContain", "Shirt")]).unwrap();

    let a = services.products.count_by_criteria(&contains).await.unwrap();
    let b = services.products.count_by_criteria(&lacks).await.unwrap();
    assert_eq!(a, 2);
    assert_eq!(a + b, 3);

    // Case-sensitive
    let lower = ProductCriteria::from_pairs([("name.contains", "shirt")]).unwrap();
    assert_eq!(services.products.count_by_criteria(&lower).await.unwrap(), 0);
}

#[tokio::test]
async fn test_does_not_contain_skips_nulls() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    // No category has a description
    let lacks = ProductCategoryCriteria::from_pairs([("description.doesNotContain", "x")]).unwrap();
    assert_eq!(
        services
            .product_categories
            .count_by_criteria(&lacks)
            .await
            .unwrap(),
        0
    );

    let unset = ProductCategoryCriteria::from_pairs([("description.specified", "false")]).unwrap();
    assert_eq!(
        services
            .product_categories
            .count_by_criteria(&unset)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_in_and_not_in() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let within = ProductCriteria::from_pairs([("size.in", "S,L")]).unwrap();
    let outside = ProductCriteria::from_pairs([("size.notIn", "S,L")]).unwrap();
    assert_eq!(services.products.count_by_criteria(&within).await.unwrap(), 2);
    assert_eq!(services.products.count_by_criteria(&outside).await.unwrap(), 1);
}

#[tokio::test]
async fn test_many_to_one_filter() {
    let (services, _) = create_services();
    let catalogue = seed_catalogue(&services).await;

    let criteria = OrderItemCriteria::from_pairs([(
        "orderId.equals",
        catalogue.first_order.to_string(),
    )])
    .unwrap();
    let items = services
        .order_items
        .find_list_by_criteria(&criteria, &[])
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.order_code.as_deref() == Some("ORD-1")));

    let unassigned = ProductOrderCriteria::from_pairs([("customerId.specified", "false")]).unwrap();
    let orders = services
        .product_orders
        .find_list_by_criteria(&unassigned, &[])
        .await
        .unwrap();
    assert_eq!(ids(&orders, |o| o.id), BTreeSet::from([catalogue.second_order]));
}

#[tokio::test]
async fn test_one_to_many_filter_is_distinct() {
    let (services, _) = create_services();
    let catalogue = seed_catalogue(&services).await;

    // Shirts has two products; the category must still appear once.
    let criteria = ProductCategoryCriteria::from_pairs([(
        "productId.in",
        format!("{},{}", catalogue.oxford, catalogue.polo),
    )])
    .unwrap();
    let page = services
        .product_categories
        .find_by_criteria(&criteria, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].id, Some(catalogue.shirts));

    let with_orders = CustomerCriteria::from_pairs([("orderId.specified", "true")]).unwrap();
    assert_eq!(
        services.customers.count_by_criteria(&with_orders).await.unwrap(),
        1
    );

    let order_with_item = ProductOrderCriteria::from_pairs([(
        "orderItemId.greaterThan",
        "0",
    )])
    .unwrap();
    assert_eq!(
        services
            .product_orders
            .count_by_criteria(&order_with_item)
            .await
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_conditions_are_anded() {
    let (services, _) = create_services();
    let catalogue = seed_catalogue(&services).await;

    let criteria = ProductCriteria::from_pairs([
        ("productCategoryId.equals", catalogue.shirts.to_string()),
        ("price.lessThan", "30".to_string()),
    ])
    .unwrap();
    let products = services
        .products
        .find_list_by_criteria(&criteria, &[])
        .await
        .unwrap();
    assert_eq!(ids(&products, |p| p.id), BTreeSet::from([catalogue.polo]));
}

#[tokio::test]
async fn test_paging_and_sorting() {
    let (services, _) = create_services();
    seed_catalogue(&services).await;

    let request = PageRequest::new(0, 2).with_sort("price", Direction::Desc);
    let first = services.products.find_all(&request).await.unwrap();
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages(), 2);
    assert!(first.has_next());
    let names: Vec<_> = first.content.iter().filter_map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["Oxford Shirt", "Polo Shirt"]);

    let second = services
        .products
        .find_all(&PageRequest::new(1, 2).with_sort("price", Direction::Desc))
        .await
        .unwrap();
    assert_eq!(second.content.len(), 1);
    assert!(second.has_previous());
    assert!(!second.has_next());

    let by_category = services
        .products
        .find_all(&PageRequest::default().with_sort("productCategory.name", Direction::Asc))
        .await
        .unwrap();
    assert_eq!(by_category.content[0].product_category_name.as_deref(), Some("Hats"));
}

#[tokio::test]
async fn test_unknown_sort_property_is_rejected() {
    let (services, _) = create_services();
    let err = services
        .products
        .find_all(&PageRequest::default().with_sort("colour", Direction::Asc))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Criteria(CriteriaError::UnknownSortProperty { .. })
    ));
}

#[test]
fn test_malformed_values_fail_fast() {
    for (key, value) in [
        ("price.greaterThan", "cheap"),
        ("size.equals", "HUGE"),
        ("id.equals", "one"),
        ("name.specified", "maybe"),
    ] {
        let err = ProductCriteria::from_pairs([(key, value)]).unwrap_err();
        assert!(
            matches!(err, CriteriaError::InvalidValue { .. }),
            "{key}={value} gave {err:?}"
        );
    }

    let err = ProductOrderCriteria::from_pairs([("placedDate.lessThan", "yesterday")]).unwrap_err();
    assert!(matches!(err, CriteriaError::InvalidValue { .. }));
}
