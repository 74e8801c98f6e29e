//! The per-entity dual-write service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{BackendKind, Entity, Repository};
use crate::error::{IdentityError, IndexError, ResourceError, StorageResult};
use crate::mirror::{IndexMirror, MirrorEvent, MirrorOutcome};
use crate::types::{Direction, Dto, Page, PageRequest, SortOrder};

const REINDEX_PAGE_SIZE: u32 = 500;

/// The result of a save together with what happened in the search index.
#[derive(Debug, Clone)]
pub struct SaveReceipt<D> {
    /// The DTO of the stored record.
    pub dto: D,
    /// Whether the index reflects the write.
    pub outcome: MirrorOutcome,
}

/// CRUD, criteria queries and free-text search for one entity.
///
/// Writes go to the relational store first; only after they succeed is the
/// stored record mirrored into the search index. Index failures are logged
/// and deferred by the [`IndexMirror`], never returned. Reads by id and by
/// criteria use the relational store, free-text searches use the index.
pub struct EntityService<E: Entity> {
    repository: Arc<dyn Repository<E>>,
    mirror: Arc<IndexMirror>,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            mirror: Arc::clone(&self.mirror),
        }
    }
}

impl<E: Entity> std::fmt::Debug for EntityService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityService")
            .field("entity", &E::NAME)
            .field("store", &self.repository.backend_kind())
            .field("mirror", &self.mirror)
            .finish()
    }
}

impl<E: Entity> EntityService<E> {
    /// Creates a service over a repository and a mirror.
    pub fn new(repository: Arc<dyn Repository<E>>, mirror: Arc<IndexMirror>) -> Self {
        Self { repository, mirror }
    }

    /// Returns the mirror used for index writes.
    pub fn mirror(&self) -> &Arc<IndexMirror> {
        &self.mirror
    }

    /// Inserts a DTO without id, or updates the record with its id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - If the DTO misses required fields
    /// * `StorageError::Resource(NotFound)` - If the id does not exist
    pub async fn save(&self, dto: E::Dto) -> StorageResult<E::Dto> {
        Ok(self.save_with_receipt(dto).await?.dto)
    }

    /// Like [`save`](Self::save), also reporting the mirror outcome.
    pub async fn save_with_receipt(&self, dto: E::Dto) -> StorageResult<SaveReceipt<E::Dto>> {
        let entity: E = dto.try_into()?;

        let stored = match entity.id() {
            None => self.repository.insert(entity).await?,
            Some(_) => self.repository.update(entity).await?,
        };
        let id = stored
            .id()
            .ok_or_else(|| IdentityError::IdMissing {
                entity: E::NAME.to_string(),
            })?;
        debug!(entity = E::NAME, id, "Saved");

        let dto = E::Dto::from(&stored);
        let outcome = match serde_json::to_value(&dto) {
            Ok(document) => {
                self.mirror
                    .apply(MirrorEvent::upsert(E::INDEX, id, document))
                    .await
            }
            Err(e) => {
                tracing::warn!(entity = E::NAME, id, error = %e, "Could not serialize index document");
                MirrorOutcome::Deferred
            }
        };

        Ok(SaveReceipt { dto, outcome })
    }

    /// Saves a new record; the DTO must not carry an id.
    pub async fn create(&self, dto: E::Dto) -> StorageResult<E::Dto> {
        if dto.id().is_some() {
            return Err(IdentityError::IdPresent {
                entity: E::NAME.to_string(),
            }
            .into());
        }
        self.save(dto).await
    }

    /// Saves an existing record; the DTO must carry an id.
    pub async fn update(&self, dto: E::Dto) -> StorageResult<E::Dto> {
        if dto.id().is_none() {
            return Err(IdentityError::IdMissing {
                entity: E::NAME.to_string(),
            }
            .into());
        }
        self.save(dto).await
    }

    /// Returns one page of all records.
    pub async fn find_all(&self, page: &PageRequest) -> StorageResult<Page<E::Dto>> {
        self.find_by_criteria(&E::Criteria::default(), page).await
    }

    /// Returns one record by id.
    pub async fn find_one(&self, id: i64) -> StorageResult<Option<E::Dto>> {
        debug!(entity = E::NAME, id, "Find one");
        let found = self.repository.find_by_id(id).await?;
        Ok(found.as_ref().map(E::Dto::from))
    }

    /// Returns one page of records matching the criteria.
    pub async fn find_by_criteria(
        &self,
        criteria: &E::Criteria,
        page: &PageRequest,
    ) -> StorageResult<Page<E::Dto>> {
        debug!(entity = E::NAME, criteria = ?criteria, page = page.page, size = page.size, "Find by criteria");
        let found = self.repository.find_page(criteria, page).await?;
        Ok(found.map(|entity| E::Dto::from(&entity)))
    }

    /// Returns every record matching the criteria.
    pub async fn find_list_by_criteria(
        &self,
        criteria: &E::Criteria,
        sort: &[SortOrder],
    ) -> StorageResult<Vec<E::Dto>> {
        debug!(entity = E::NAME, criteria = ?criteria, "Find list by criteria");
        let found = self.repository.find_all(criteria, sort).await?;
        Ok(found.iter().map(E::Dto::from).collect())
    }

    /// Counts the records matching the criteria.
    pub async fn count_by_criteria(&self, criteria: &E::Criteria) -> StorageResult<u64> {
        debug!(entity = E::NAME, criteria = ?criteria, "Count by criteria");
        self.repository.count(criteria).await
    }

    /// Deletes a record, then its index document.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If no record has the id
    /// * `StorageError::Resource(InUse)` - If other records reference it
    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        self.delete_with_receipt(id).await.map(|_| ())
    }

    /// Like [`delete`](Self::delete), also reporting the mirror outcome.
    pub async fn delete_with_receipt(&self, id: i64) -> StorageResult<MirrorOutcome> {
        if !self.repository.delete_by_id(id).await? {
            return Err(ResourceError::NotFound {
                entity: E::NAME.to_string(),
                id,
            }
            .into());
        }
        debug!(entity = E::NAME, id, "Deleted");

        Ok(self.mirror.apply(MirrorEvent::delete(E::INDEX, id)).await)
    }

    /// Runs a free-text query against the search index.
    ///
    /// # Errors
    ///
    /// * `StorageError::Index(QueryParse)` - If the query is malformed
    /// * `StorageError::Index(Unavailable)` - If the index cannot be reached
    pub async fn search(&self, query: &str, page: &PageRequest) -> StorageResult<Page<E::Dto>> {
        debug!(entity = E::NAME, query, "Search");
        let hits = self.mirror.index().search(E::INDEX, query, page).await?;

        let content = hits
            .documents
            .into_iter()
            .map(|document| {
                serde_json::from_value::<E::Dto>(document).map_err(|e| IndexError::Document {
                    message: format!("{}: {}", E::NAME, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, hits.total, page))
    }

    /// Rebuilds the entity's index from the relational store.
    ///
    /// Each record is re-read while its index entry is locked, so a record
    /// deleted during the rebuild stays out of the index. Returns the number
    /// of documents written.
    pub async fn reindex(&self) -> StorageResult<u64> {
        let index = self.mirror.index();
        index.clear(E::INDEX).await?;

        let criteria = E::Criteria::default();
        let mut request = PageRequest::new(0, REINDEX_PAGE_SIZE).with_sort("id", Direction::Asc);
        let mut written = 0u64;

        loop {
            let page = self.repository.find_page(&criteria, &request).await?;
            for id in page.content.iter().filter_map(|entity| entity.id()) {
                // Re-read under the lane so a concurrent write or delete is not undone
                let _lane = self.mirror.lock_record(E::INDEX, id).await;
                let Some(current) = self.repository.find_by_id(id).await? else {
                    continue;
                };
                let document = serde_json::to_value(E::Dto::from(&current))?;
                index.upsert(E::INDEX, id, document).await?;
                self.mirror.outbox().remove(E::INDEX, id);
                written += 1;
            }
            if !page.has_next() {
                break;
            }
            request.page += 1;
        }

        index.refresh(E::INDEX).await?;
        info!(entity = E::NAME, documents = written, "Reindexed");
        Ok(written)
    }

    /// Checks that the relational store is reachable.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.repository.health_check().await
    }

    /// Names the relational store behind this service.
    pub fn store_kind(&self) -> BackendKind {
        self.repository.backend_kind()
    }
}

/// Type-erased index maintenance, for running over every entity.
#[async_trait]
pub trait Reindex: Send + Sync {
    /// Display name of the entity.
    fn entity_name(&self) -> &'static str;

    /// Creates the entity's index if needed.
    async fn ensure_index(&self) -> StorageResult<()>;

    /// Rebuilds the entity's index from the relational store.
    async fn reindex(&self) -> StorageResult<u64>;
}

#[async_trait]
impl<E: Entity> Reindex for EntityService<E> {
    fn entity_name(&self) -> &'static str {
        E::NAME
    }

    async fn ensure_index(&self) -> StorageResult<()> {
        Ok(self.mirror.index().ensure_index(E::INDEX).await?)
    }

    async fn reindex(&self) -> StorageResult<u64> {
        EntityService::<E>::reindex(self).await
    }
}
