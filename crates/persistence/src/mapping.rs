//! Entity and transport mapping.
//!
//! `From<&Entity> for Dto` is total: it copies every field and flattens each
//! loaded [`Reference`] into an id plus its display field (left unset when the
//! reference is unset or was not loaded).
//!
//! `TryFrom<Dto> for Entity` validates first and then rebuilds references by
//! id only. Display fields sent by a client are ignored, and collections that
//! point back at a record (an order's items, a category's products) are never
//! rebuilt here: they change only through their owning side.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{FieldViolation, ValidationError};
use crate::types::{
    Customer, CustomerDto, OrderItem, OrderItemDto, Product, ProductCategory, ProductCategoryDto,
    ProductDto, ProductOrder, ProductOrderDto, Reference,
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Collects field violations for one record.
struct Checker {
    entity: &'static str,
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            violations: Vec::new(),
        }
    }

    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.violations.push(FieldViolation::not_null(field));
        }
        value
    }

    fn at_least<T: PartialOrd + Display>(&mut self, field: &str, value: Option<&T>, bound: T) {
        if let Some(value) = value {
            if *value < bound {
                self.violations.push(FieldViolation::min(field, bound));
            }
        }
    }

    fn email(&mut self, field: &str, value: Option<&String>) {
        if let Some(value) = value {
            if !EMAIL.is_match(value) {
                self.violations
                    .push(FieldViolation::pattern(field, "must be a well-formed email address"));
            }
        }
    }

    fn into_error(self) -> ValidationError {
        ValidationError::InvalidFields {
            entity: self.entity.to_string(),
            violations: self.violations,
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

fn flatten(reference: &Option<Reference>) -> (Option<i64>, Option<String>) {
    match reference {
        Some(r) => (Some(r.id), r.display.clone()),
        None => (None, None),
    }
}

// ProductCategory

impl From<&ProductCategory> for ProductCategoryDto {
    fn from(entity: &ProductCategory) -> Self {
        Self {
            id: entity.id,
            name: Some(entity.name.clone()),
            description: entity.description.clone(),
        }
    }
}

impl TryFrom<ProductCategoryDto> for ProductCategory {
    type Error = ValidationError;

    fn try_from(dto: ProductCategoryDto) -> Result<Self, Self::Error> {
        let mut check = Checker::new("ProductCategory");
        let Some(name) = check.required("name", dto.name) else {
            return Err(check.into_error());
        };
        check.finish()?;

        Ok(Self {
            id: dto.id,
            name,
            description: dto.description,
        })
    }
}

// Product

impl From<&Product> for ProductDto {
    fn from(entity: &Product) -> Self {
        let (product_category_id, product_category_name) = flatten(&entity.product_category);
        Self {
            id: entity.id,
            name: Some(entity.name.clone()),
            description: entity.description.clone(),
            price: Some(entity.price),
            size: Some(entity.size),
            image: entity.image.clone(),
            image_content_type: entity.image_content_type.clone(),
            product_category_id,
            product_category_name,
        }
    }
}

impl TryFrom<ProductDto> for Product {
    type Error = ValidationError;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        let mut check = Checker::new("Product");
        let name = check.required("name", dto.name);
        let price = check.required("price", dto.price);
        let size = check.required("size", dto.size);
        check.at_least("price", price.as_ref(), Decimal::ZERO);

        let (Some(name), Some(price), Some(size)) = (name, price, size) else {
            return Err(check.into_error());
        };
        check.finish()?;

        Ok(Self {
            id: dto.id,
            name,
            description: dto.description,
            price,
            size,
            image: dto.image,
            image_content_type: dto.image_content_type,
            product_category: dto.product_category_id.map(Reference::to),
        })
    }
}

// Customer

impl From<&Customer> for CustomerDto {
    fn from(entity: &Customer) -> Self {
        Self {
            id: entity.id,
            first_name: Some(entity.first_name.clone()),
            last_name: Some(entity.last_name.clone()),
            gender: Some(entity.gender),
            email: Some(entity.email.clone()),
            phone: Some(entity.phone.clone()),
            address_line1: Some(entity.address_line1.clone()),
            address_line2: entity.address_line2.clone(),
            city: Some(entity.city.clone()),
            country: Some(entity.country.clone()),
        }
    }
}

impl TryFrom<CustomerDto> for Customer {
    type Error = ValidationError;

    fn try_from(dto: CustomerDto) -> Result<Self, Self::Error> {
        let mut check = Checker::new("Customer");
        let first_name = check.required("firstName", dto.first_name);
        let last_name = check.required("lastName", dto.last_name);
        let gender = check.required("gender", dto.gender);
        let email = check.required("email", dto.email);
        let phone = check.required("phone", dto.phone);
        let address_line1 = check.required("addressLine1", dto.address_line1);
        let city = check.required("city", dto.city);
        let country = check.required("country", dto.country);
        check.email("email", email.as_ref());

        let (
            Some(first_name),
            Some(last_name),
            Some(gender),
            Some(email),
            Some(phone),
            Some(address_line1),
            Some(city),
            Some(country),
        ) = (
            first_name,
            last_name,
            gender,
            email,
            phone,
            address_line1,
            city,
            country,
        )
        else {
            return Err(check.into_error());
        };
        check.finish()?;

        Ok(Self {
            id: dto.id,
            first_name,
            last_name,
            gender,
            email,
            phone,
            address_line1,
            address_line2: dto.address_line2,
            city,
            country,
        })
    }
}

// ProductOrder

impl From<&ProductOrder> for ProductOrderDto {
    fn from(entity: &ProductOrder) -> Self {
        let (customer_id, customer_email) = flatten(&entity.customer);
        Self {
            id: entity.id,
            placed_date: Some(entity.placed_date),
            status: Some(entity.status),
            code: Some(entity.code.clone()),
            invoice_id: entity.invoice_id,
            customer_id,
            customer_email,
        }
    }
}

impl TryFrom<ProductOrderDto> for ProductOrder {
    type Error = ValidationError;

    fn try_from(dto: ProductOrderDto) -> Result<Self, Self::Error> {
        let mut check = Checker::new("ProductOrder");
        let placed_date = check.required("placedDate", dto.placed_date);
        let status = check.required("status", dto.status);
        let code = check.required("code", dto.code);

        let (Some(placed_date), Some(status), Some(code)) = (placed_date, status, code) else {
            return Err(check.into_error());
        };
        check.finish()?;

        Ok(Self {
            id: dto.id,
            placed_date,
            status,
            code,
            invoice_id: dto.invoice_id,
            customer: dto.customer_id.map(Reference::to),
        })
    }
}

// OrderItem

impl From<&OrderItem> for OrderItemDto {
    fn from(entity: &OrderItem) -> Self {
        let (product_id, product_name) = flatten(&entity.product);
        let (order_id, order_code) = flatten(&entity.order);
        Self {
            id: entity.id,
            quantity: Some(entity.quantity),
            total_price: Some(entity.total_price),
            status: Some(entity.status),
            product_id,
            product_name,
            order_id,
            order_code,
        }
    }
}

impl TryFrom<OrderItemDto> for OrderItem {
    type Error = ValidationError;

    fn try_from(dto: OrderItemDto) -> Result<Self, Self::Error> {
        let mut check = Checker::new("OrderItem");
        let quantity = check.required("quantity", dto.quantity);
        let total_price = check.required("totalPrice", dto.total_price);
        let status = check.required("status", dto.status);
        check.at_least("quantity", quantity.as_ref(), 0);
        check.at_least("totalPrice", total_price.as_ref(), Decimal::ZERO);

        let (Some(quantity), Some(total_price), Some(status)) = (quantity, total_price, status)
        else {
            return Err(check.into_error());
        };
        check.finish()?;

        Ok(Self {
            id: dto.id,
            quantity,
            total_price,
            status,
            product: dto.product_id.map(Reference::to),
            order: dto.order_id.map(Reference::to),
        })
    }
}
