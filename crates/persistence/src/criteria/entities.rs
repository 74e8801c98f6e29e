//! Criteria for each entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{Gender, OrderItemStatus, OrderStatus, Size};

use super::{Filter, RangeFilter, StringFilter};

define_criteria! {
    /// Filters for product category queries.
    ProductCategoryCriteria {
        id: RangeFilter<i64> => "id",
        name: StringFilter => "name",
        description: StringFilter => "description",
        product_id: RangeFilter<i64> => "productId",
    }
}

define_criteria! {
    /// Filters for product queries.
    ProductCriteria {
        id: RangeFilter<i64> => "id",
        name: StringFilter => "name",
        description: StringFilter => "description",
        price: RangeFilter<Decimal> => "price",
        size: Filter<Size> => "size",
        product_category_id: RangeFilter<i64> => "productCategoryId",
    }
}

define_criteria! {
    /// Filters for customer queries.
    CustomerCriteria {
        id: RangeFilter<i64> => "id",
        first_name: StringFilter => "firstName",
        last_name: StringFilter => "lastName",
        gender: Filter<Gender> => "gender",
        email: StringFilter => "email",
        phone: StringFilter => "phone",
        city: StringFilter => "city",
        country: StringFilter => "country",
        order_id: RangeFilter<i64> => "orderId",
    }
}

define_criteria! {
    /// Filters for product order queries.
    ProductOrderCriteria {
        id: RangeFilter<i64> => "id",
        placed_date: RangeFilter<DateTime<Utc>> => "placedDate",
        status: Filter<OrderStatus> => "status",
        code: StringFilter => "code",
        invoice_id: RangeFilter<i64> => "invoiceId",
        order_item_id: RangeFilter<i64> => "orderItemId",
        customer_id: RangeFilter<i64> => "customerId",
    }
}

define_criteria! {
    /// Filters for order item queries.
    OrderItemCriteria {
        id: RangeFilter<i64> => "id",
        quantity: RangeFilter<i32> => "quantity",
        total_price: RangeFilter<Decimal> => "totalPrice",
        status: Filter<OrderItemStatus> => "status",
        product_id: RangeFilter<i64> => "productId",
        order_id: RangeFilter<i64> => "orderId",
    }
}
