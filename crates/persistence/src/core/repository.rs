//! The relational store facade.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Page, PageRequest, SortOrder};

use super::{BackendKind, Entity};

/// CRUD and criteria queries for one entity type.
///
/// Criteria are translated into a single predicate that serves both
/// [`find_page`](Repository::find_page) and [`count`](Repository::count), so
/// a page's `total_elements` always agrees with `count` for the same criteria.
///
/// Returned entities carry their references with the display field loaded.
///
/// # Example
///
/// ```ignore
/// use storefront_persistence::core::Repository;
/// use storefront_persistence::criteria::{Criteria, OrderItemCriteria};
/// use storefront_persistence::types::{OrderItem, PageRequest};
///
/// async fn pending_lines<R: Repository<OrderItem>>(repo: &R) -> StorageResult<u64> {
///     let criteria = OrderItemCriteria::from_pairs([("status.equals", "BACK_ORDER")])?;
///     repo.count(&criteria).await
/// }
/// ```
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Returns the kind of store behind this repository.
    fn backend_kind(&self) -> BackendKind;

    /// Inserts a record that has no id yet and returns it with its new id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Identity(IdPresent)` - If the record already has an id
    /// * `StorageError::Validation(InvalidReference)` - If a reference points nowhere
    async fn insert(&self, entity: E) -> StorageResult<E>;

    /// Replaces the stored row with the same id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Identity(IdMissing)` - If the record has no id
    /// * `StorageError::Resource(NotFound)` - If no row has that id
    /// * `StorageError::Validation(InvalidReference)` - If a reference points nowhere
    async fn update(&self, entity: E) -> StorageResult<E>;

    /// Reads one record by id.
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<E>>;

    /// Returns one page of records matching the criteria.
    ///
    /// # Errors
    ///
    /// * `StorageError::Criteria(UnknownSortProperty)` - If a sort key is not sortable
    async fn find_page(&self, criteria: &E::Criteria, page: &PageRequest)
    -> StorageResult<Page<E>>;

    /// Returns every record matching the criteria.
    async fn find_all(&self, criteria: &E::Criteria, sort: &[SortOrder]) -> StorageResult<Vec<E>>;

    /// Counts the records matching the criteria.
    async fn count(&self, criteria: &E::Criteria) -> StorageResult<u64>;

    /// Deletes one record by id. Returns `false` if no row had that id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(InUse)` - If other rows still reference it
    async fn delete_by_id(&self, id: i64) -> StorageResult<bool>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> StorageResult<()>;
}
