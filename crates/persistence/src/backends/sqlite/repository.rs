//! [`Repository`] implementation for every [`SqliteTable`] entity.

use async_trait::async_trait;
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::core::{BackendKind, Entity, Repository};
use crate::criteria::{Criteria, CriteriaValue, FieldPredicate, Predicate};
use crate::error::{
    BackendError, IdentityError, ResourceError, StorageError, StorageResult, ValidationError,
};
use crate::types::{Page, PageRequest, SortOrder};

use super::SqliteBackend;
use super::query::{SqlParam, Specification};
use super::tables::SqliteTable;

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Maps a failed insert or update.
fn write_error<E: Entity>(err: rusqlite::Error) -> StorageError {
    if is_foreign_key_violation(&err) {
        ValidationError::InvalidReference {
            entity: E::NAME.to_string(),
            message: "a referenced record does not exist".to_string(),
        }
        .into()
    } else {
        err.into()
    }
}

fn by_id(id: i64) -> [FieldPredicate; 1] {
    [FieldPredicate {
        field: "id",
        predicate: Predicate::Equals(CriteriaValue::Integer(id)),
    }]
}

fn query_rows<E: SqliteTable>(
    conn: &Connection,
    sql: &str,
    params: &[SqlParam],
) -> StorageResult<Vec<E>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| E::from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn count_rows<E: SqliteTable>(conn: &Connection, spec: &Specification) -> StorageResult<u64> {
    let count: i64 = conn.query_row(
        &spec.count_sql::<E>(),
        params_from_iter(spec.params().iter()),
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or_default())
}

fn load_one<E: SqliteTable>(conn: &Connection, id: i64) -> StorageResult<Option<E>> {
    let spec = Specification::build::<E>(&by_id(id))?;
    let sql = spec.select_sql::<E>(&[], None)?;
    Ok(query_rows::<E>(conn, &sql, spec.params())?.into_iter().next())
}

fn reload<E: SqliteTable>(conn: &Connection, id: i64) -> StorageResult<E> {
    load_one::<E>(conn, id)?
        .ok_or_else(|| internal_error(format!("{} {} vanished after write", E::NAME, id)))
}

fn insert_row<E: SqliteTable>(conn: &Connection, entity: &E) -> StorageResult<i64> {
    let placeholders = (1..=E::WRITE_COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::TABLE,
        E::WRITE_COLUMNS.join(", "),
        placeholders
    );
    conn.execute(&sql, params_from_iter(entity.write_params().iter()))
        .map_err(write_error::<E>)?;
    Ok(conn.last_insert_rowid())
}

fn update_row<E: SqliteTable>(conn: &Connection, entity: &E, id: i64) -> StorageResult<usize> {
    let assignments = E::WRITE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        E::TABLE,
        assignments,
        E::WRITE_COLUMNS.len() + 1
    );
    let mut params = entity.write_params();
    params.push(SqlParam::Integer(id));
    conn.execute(&sql, params_from_iter(params.iter()))
        .map_err(write_error::<E>)
}

#[async_trait]
impl<E: SqliteTable> Repository<E> for SqliteBackend {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn insert(&self, entity: E) -> StorageResult<E> {
        if entity.id().is_some() {
            return Err(IdentityError::IdPresent {
                entity: E::NAME.to_string(),
            }
            .into());
        }

        self.with_connection(move |conn| {
            let id = insert_row(conn, &entity)?;
            debug!(entity = E::NAME, id, "Inserted row");
            reload(conn, id)
        })
        .await
    }

    async fn update(&self, entity: E) -> StorageResult<E> {
        let id = entity.id().ok_or_else(|| IdentityError::IdMissing {
            entity: E::NAME.to_string(),
        })?;

        self.with_connection(move |conn| {
            if update_row(conn, &entity, id)? == 0 {
                return Err(ResourceError::NotFound {
                    entity: E::NAME.to_string(),
                    id,
                }
                .into());
            }
            debug!(entity = E::NAME, id, "Updated row");
            reload(conn, id)
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Option<E>> {
        self.with_connection(move |conn| load_one(conn, id)).await
    }

    async fn find_page(
        &self,
        criteria: &E::Criteria,
        page: &PageRequest,
    ) -> StorageResult<Page<E>> {
        let spec = Specification::build::<E>(&criteria.predicates())?;
        let sql = spec.select_sql::<E>(&page.sort, Some(page))?;
        let offset = page.offset();

        let (total, content) = self
            .with_connection(move |conn| {
                let total = count_rows::<E>(conn, &spec)?;
                let content = if total > offset {
                    query_rows::<E>(conn, &sql, spec.params())?
                } else {
                    Vec::new()
                };
                Ok((total, content))
            })
            .await?;
        debug!(entity = E::NAME, total, returned = content.len(), "Found page");
        Ok(Page::new(content, total, page))
    }

    async fn find_all(&self, criteria: &E::Criteria, sort: &[SortOrder]) -> StorageResult<Vec<E>> {
        let spec = Specification::build::<E>(&criteria.predicates())?;
        let sql = spec.select_sql::<E>(sort, None)?;
        self.with_connection(move |conn| query_rows::<E>(conn, &sql, spec.params()))
            .await
    }

    async fn count(&self, criteria: &E::Criteria) -> StorageResult<u64> {
        let spec = Specification::build::<E>(&criteria.predicates())?;
        self.with_connection(move |conn| count_rows::<E>(conn, &spec))
            .await
    }

    async fn delete_by_id(&self, id: i64) -> StorageResult<bool> {
        self.with_connection(move |conn| {
            let deleted = conn
                .execute(&format!("DELETE FROM {} WHERE id = ?1", E::TABLE), [id])
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        ResourceError::InUse {
                            entity: E::NAME.to_string(),
                            id,
                        }
                        .into()
                    } else {
                        StorageError::from(e)
                    }
                })?;
            debug!(entity = E::NAME, id, deleted, "Deleted row");
            Ok(deleted > 0)
        })
        .await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.run_blocking(SqliteBackend::ping).await
    }
}
