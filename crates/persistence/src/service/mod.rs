//! Entity services: the dual-write layer between transport and storage.
//!
//! [`EntityService`] orchestrates the relational store and the search index
//! for one entity. [`Services`] bundles one service per entity, sharing a
//! store and a mirror.

mod entity;

use std::sync::Arc;

use crate::core::{BackendKind, Repository};
use crate::error::StorageResult;
use crate::mirror::IndexMirror;
use crate::types::{Customer, OrderItem, Product, ProductCategory, ProductOrder};

pub use entity::{EntityService, Reindex, SaveReceipt};

/// One service per entity over a shared store and mirror.
#[derive(Debug, Clone)]
pub struct Services {
    /// Product categories.
    pub product_categories: EntityService<ProductCategory>,
    /// Products.
    pub products: EntityService<Product>,
    /// Customers.
    pub customers: EntityService<Customer>,
    /// Product orders.
    pub product_orders: EntityService<ProductOrder>,
    /// Order items.
    pub order_items: EntityService<OrderItem>,
    mirror: Arc<IndexMirror>,
}

impl Services {
    /// Creates services over a store that holds every entity.
    pub fn new<R>(store: Arc<R>, mirror: Arc<IndexMirror>) -> Self
    where
        R: Repository<ProductCategory>
            + Repository<Product>
            + Repository<Customer>
            + Repository<ProductOrder>
            + Repository<OrderItem>
            + 'static,
    {
        Self {
            product_categories: EntityService::<ProductCategory>::new(
                store.clone(),
                mirror.clone(),
            ),
            products: EntityService::<Product>::new(store.clone(), mirror.clone()),
            customers: EntityService::<Customer>::new(store.clone(), mirror.clone()),
            product_orders: EntityService::<ProductOrder>::new(store.clone(), mirror.clone()),
            order_items: EntityService::<OrderItem>::new(store, mirror.clone()),
            mirror,
        }
    }

    /// Returns the shared index mirror.
    pub fn mirror(&self) -> &Arc<IndexMirror> {
        &self.mirror
    }

    /// Returns every service as index maintenance handles, parents first.
    pub fn indexed(&self) -> [&dyn Reindex; 5] {
        [
            &self.product_categories,
            &self.products,
            &self.customers,
            &self.product_orders,
            &self.order_items,
        ]
    }

    /// Creates every entity index if needed.
    pub async fn ensure_indexes(&self) -> StorageResult<()> {
        for service in self.indexed() {
            service.ensure_index().await?;
        }
        Ok(())
    }

    /// Rebuilds every entity index; returns documents written per entity.
    pub async fn reindex_all(&self) -> StorageResult<Vec<(&'static str, u64)>> {
        let mut written = Vec::new();
        for service in self.indexed() {
            written.push((service.entity_name(), service.reindex().await?));
        }
        Ok(written)
    }

    /// Checks that the relational store is reachable.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.product_categories.health_check().await
    }

    /// Names the relational store shared by every service.
    pub fn store_kind(&self) -> BackendKind {
        self.product_categories.store_kind()
    }
}
