//! Core types for the persistence layer.
//!
//! - Entities ([`Product`], [`OrderItem`], ...) are the persisted record shapes.
//! - DTOs ([`ProductDto`], [`OrderItemDto`], ...) are the transport shapes.
//! - [`PageRequest`] and [`Page`] carry offset pagination.
//!
//! # Example
//!
//! ```
//! use storefront_persistence::types::{Direction, PageRequest};
//!
//! let request = PageRequest::new(2, 25).with_sort("name", Direction::Desc);
//! assert_eq!(request.offset(), 50);
//! ```

mod dto;
mod entities;
mod enums;
mod pagination;

pub use dto::{CustomerDto, Dto, OrderItemDto, ProductCategoryDto, ProductDto, ProductOrderDto};
pub use entities::{Customer, OrderItem, Product, ProductCategory, ProductOrder, Reference};
pub use enums::{Gender, OrderItemStatus, OrderStatus, Size};
pub use pagination::{Direction, Page, PageRequest, SortOrder};
