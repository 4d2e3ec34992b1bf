// ABOUTME: Write operations - save dispatch per ObjectSource, deletes, batch import
// ABOUTME: Inserts share one executor-generic helper so transactions reuse it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use chrono::{DateTime, Utc};
use sqlx::sqlite::Sqlite;
use sqlx::Executor;
use tracing::{debug, trace};

use super::fk::FkFailure;
use super::Database;
use crate::entity::{Entity, ObjectSource};
use crate::errors::{AppError, AppResult};
use crate::schema::table::{CREATED_INDEX, ID_INDEX, MODIFIED_INDEX};
use crate::schema::{ColumnSpec, EntityKind, Value};
use crate::sql::{bind, template};

/// Result of persisting an import batch: what was inserted and which
/// entities failed natural-key resolution
#[derive(Debug)]
pub struct ImportSaveOutcome<M: EntityKind> {
    /// Entities now present in the store, with ids assigned
    pub saved: Vec<Entity<M>>,
    /// Entities excluded from persistence, with the offending reference
    pub failed: Vec<FkFailure<M>>,
}

async fn insert_on<'c, E, M>(
    executor: E,
    entity: &Entity<M>,
    preserve_id: bool,
    now: DateTime<Utc>,
) -> AppResult<i64>
where
    E: Executor<'c, Database = Sqlite>,
    M: EntityKind,
{
    let table = M::table();
    let columns: Vec<&ColumnSpec> = table
        .columns()
        .iter()
        .filter(|c| preserve_id || c.index != ID_INDEX)
        .collect();
    let values: Vec<Option<Value>> = columns
        .iter()
        .map(|c| match c.index {
            CREATED_INDEX | MODIFIED_INDEX => Some(
                entity
                    .data()
                    .get_raw(c)
                    .cloned()
                    .unwrap_or(Value::Timestamp(now)),
            ),
            _ => entity.data().get_raw(c).cloned(),
        })
        .collect();

    let sql = template::insert(table.name(), &columns);
    let mut query = sqlx::query(&sql);
    for (column, value) in columns.iter().zip(&values) {
        query = bind::bind_nullable(query, column.value_type, value.as_ref());
    }
    let result = query.execute(executor).await?;

    let id = if preserve_id {
        entity.id().expect("restore entities carry their id")
    } else {
        result.last_insert_rowid()
    };
    Ok(id)
}

/// Rebuild the entity as it now exists in the store. `stamp_modified`
/// mirrors what the statement did: updates stamped `modified_at`, inserts
/// kept whatever the row carried (restores preserve their history).
fn persisted_from<M: EntityKind>(
    entity: &Entity<M>,
    id: i64,
    now: DateTime<Utc>,
    stamp_modified: bool,
) -> AppResult<Entity<M>> {
    let table = M::table();
    let mut data = entity.data().copy();
    data.put_raw(table.id_column(), Some(Value::Integer(id)))?;
    if !data.has_data(table.created_column()) {
        data.put_raw(table.created_column(), Some(Value::Timestamp(now)))?;
    }
    if stamp_modified || !data.has_data(table.modified_column()) {
        data.put_raw(table.modified_column(), Some(Value::Timestamp(now)))?;
    }
    Entity::new(data, ObjectSource::Database)
}

impl Database {
    /// Persist an entity according to its provenance.
    ///
    /// Dispatch: `Import` resolves any pending natural keys and inserts,
    /// `UserNew` inserts with a fresh id, `Restore` inserts preserving its
    /// id, `DbEdit` updates by id, `Database`/`Inbuilt` are a no-op (no SQL
    /// issued). Saving a `Computed` entity is a defect and panics. Returns
    /// the persisted entity with `Database` provenance.
    pub async fn save<M: EntityKind>(&self, entity: &Entity<M>) -> AppResult<Entity<M>> {
        match entity.source() {
            ObjectSource::Database | ObjectSource::Inbuilt => {
                trace!(table = M::TABLE, id = entity.id(), "save is a no-op");
                Ok(entity.clone())
            }
            ObjectSource::Computed => {
                panic!("computed entities are never persisted")
            }
            ObjectSource::Import => {
                if !entity.has_pending_fk() {
                    return self.insert_entity(entity, false).await;
                }
                // FK-complete first, then insert; single-entity batch
                let outcome = self.resolve_natural_keys(vec![entity.clone()]).await?;
                match outcome.resolved.into_iter().next() {
                    Some(resolved) => self.insert_entity(&resolved, false).await,
                    None => {
                        let failure = outcome
                            .failed
                            .into_iter()
                            .next()
                            .expect("unresolved entity is reported");
                        Err(AppError::fk_resolution(format!(
                            "column '{}' of '{}': no parent row matches key '{}'",
                            failure.column,
                            M::TABLE,
                            failure.value.to_raw_string()
                        )))
                    }
                }
            }
            ObjectSource::UserNew => self.insert_entity(entity, false).await,
            ObjectSource::Restore => self.insert_entity(entity, true).await,
            ObjectSource::DbEdit => self.update_entity(entity).await,
        }
    }

    async fn insert_entity<M: EntityKind>(
        &self,
        entity: &Entity<M>,
        preserve_id: bool,
    ) -> AppResult<Entity<M>> {
        let now = Utc::now();
        self.note_query();
        let id = insert_on(self.pool(), entity, preserve_id, now).await?;
        debug!(table = M::TABLE, id, "inserted");
        let saved = persisted_from(entity, id, now, false)?;
        self.cache().put(&saved);
        Ok(saved)
    }

    async fn update_entity<M: EntityKind>(&self, entity: &Entity<M>) -> AppResult<Entity<M>> {
        let table = M::table();
        let id = entity.id().expect("db_edit entities carry their id");
        let now = Utc::now();

        // All non-id columns per the update template; modified_at is stamped.
        let columns: Vec<&ColumnSpec> = table
            .columns()
            .iter()
            .filter(|c| c.index != ID_INDEX)
            .collect();
        let values: Vec<Option<Value>> = columns
            .iter()
            .map(|c| {
                if c.index == MODIFIED_INDEX {
                    Some(Value::Timestamp(now))
                } else {
                    entity.data().get_raw(c).cloned()
                }
            })
            .collect();

        let sql = template::update_by_id(table.name(), &columns);
        let mut query = sqlx::query(&sql);
        for (column, value) in columns.iter().zip(&values) {
            query = bind::bind_nullable(query, column.value_type, value.as_ref());
        }
        query = bind::bind_value(query, &Value::Integer(id));
        self.note_query();
        let result = query.execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "no row with id {id} in '{}'",
                M::TABLE
            )));
        }

        self.cache().invalidate(M::TABLE, id);
        debug!(table = M::TABLE, id, "updated");
        let saved = persisted_from(entity, id, now, true)?;
        self.cache().put(&saved);
        Ok(saved)
    }

    /// Delete one row by id; true when a row was removed
    pub async fn delete_by_id<M: EntityKind>(&self, id: i64) -> AppResult<bool> {
        let sql = template::delete_by_id(M::TABLE);
        self.note_query();
        let result = bind::bind_value(sqlx::query(&sql), &Value::Integer(id))
            .execute(self.pool())
            .await?;
        self.cache().invalidate(M::TABLE, id);
        Ok(result.rows_affected() > 0)
    }

    /// Delete rows matching `column IN (values)`; returns the removed count
    pub async fn delete_where_in<M: EntityKind>(
        &self,
        column: &ColumnSpec,
        values: &[Value],
    ) -> AppResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let sql = template::delete_where_in(M::TABLE, column, values.len());
        self.note_query();
        let result = bind::bind_values(sqlx::query(&sql), values)
            .execute(self.pool())
            .await?;
        self.cache().invalidate_table(M::TABLE);
        Ok(result.rows_affected())
    }

    /// Resolve and insert a batch of imported entities inside one
    /// transaction.
    ///
    /// Natural-key lookups are batched per foreign-key column; entities
    /// whose references cannot be resolved are reported in the outcome and
    /// excluded, without aborting the rest of the batch.
    pub async fn save_import_batch<M: EntityKind>(
        &self,
        entities: Vec<Entity<M>>,
    ) -> AppResult<ImportSaveOutcome<M>> {
        for entity in &entities {
            assert_eq!(
                entity.source(),
                ObjectSource::Import,
                "import batches accept only import entities"
            );
        }

        let outcome = self.resolve_natural_keys(entities).await?;
        let now = Utc::now();

        let mut tx = self.begin().await?;
        let mut saved = Vec::with_capacity(outcome.resolved.len());
        for entity in &outcome.resolved {
            self.note_query();
            let id = insert_on(&mut *tx, entity, false, now).await?;
            saved.push(persisted_from(entity, id, now, false)?);
        }
        tx.commit().await?;

        debug!(
            table = M::TABLE,
            saved = saved.len(),
            failed = outcome.failed.len(),
            "import batch persisted"
        );
        Ok(ImportSaveOutcome {
            saved,
            failed: outcome.failed,
        })
    }
}
