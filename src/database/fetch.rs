// ABOUTME: Generic read operations - by id, by natural key, by predicate, by keyword
// ABOUTME: Rows decode through the binder into entities with Database provenance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use sqlx::sqlite::SqliteRow;

use super::Database;
use crate::entity::{Entity, ObjectSource};
use crate::errors::{AppError, AppResult};
use crate::schema::{ColumnSpec, EntityKind, Value};
use crate::sql::{bind, template};

pub(super) fn all_columns<M: EntityKind>() -> Vec<&'static ColumnSpec> {
    M::table().columns().iter().collect()
}

fn wrap_row<M: EntityKind>(row: &SqliteRow) -> AppResult<Entity<M>> {
    Entity::new(bind::read_row::<M>(row)?, ObjectSource::Database)
}

impl Database {
    /// Load one entity by surrogate id, read-through against the cache
    pub async fn get_by_id<M: EntityKind>(&self, id: i64) -> AppResult<Option<Entity<M>>> {
        if let Some(hit) = self.cache().get::<M>(id) {
            return Ok(Some(hit));
        }
        let table = M::table();
        let sql = template::select_where_eq(table.name(), &all_columns::<M>(), table.id_column());
        self.note_query();
        let row = bind::bind_value(sqlx::query(&sql), &Value::Integer(id))
            .fetch_optional(self.pool())
            .await?;
        match row {
            None => Ok(None),
            Some(row) => {
                let entity = wrap_row::<M>(&row)?;
                self.cache().put(&entity);
                Ok(Some(entity))
            }
        }
    }

    /// Load one entity by its natural-key value; fails if the table
    /// declares no natural key
    pub async fn get_by_natural_key<M: EntityKind>(
        &self,
        key: &Value,
    ) -> AppResult<Option<Entity<M>>> {
        let table = M::table();
        let natural = table.natural_key().ok_or_else(|| {
            AppError::invalid_input(format!("table '{}' has no natural key", table.name()))
        })?;
        let sql = template::select_where_eq(table.name(), &all_columns::<M>(), natural);
        self.note_query();
        let row = bind::bind_value(sqlx::query(&sql), key)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(wrap_row::<M>).transpose()
    }

    /// Load every row of a table
    pub async fn fetch_all<M: EntityKind>(&self) -> AppResult<Vec<Entity<M>>> {
        let table = M::table();
        let sql = template::select(table.name(), &all_columns::<M>());
        self.note_query();
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        rows.iter().map(wrap_row::<M>).collect()
    }

    /// Load rows matching `column = value`
    pub async fn fetch_where_eq<M: EntityKind>(
        &self,
        column: &ColumnSpec,
        value: &Value,
    ) -> AppResult<Vec<Entity<M>>> {
        let table = M::table();
        let sql = template::select_where_eq(table.name(), &all_columns::<M>(), column);
        self.note_query();
        let rows = bind::bind_value(sqlx::query(&sql), value)
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(wrap_row::<M>).collect()
    }

    /// Batched load of rows whose `column` is one of `values`. An empty
    /// value set means nothing to load; no query is issued.
    pub async fn fetch_where_in<M: EntityKind>(
        &self,
        column: &ColumnSpec,
        values: &[Value],
    ) -> AppResult<Vec<Entity<M>>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let table = M::table();
        let sql = template::select_where_in(table.name(), &all_columns::<M>(), column, values.len());
        self.note_query();
        let rows = bind::bind_values(sqlx::query(&sql), values)
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(wrap_row::<M>).collect()
    }

    /// Keyword search over the given text columns with prefix matching.
    /// An empty keyword selects all rows (no WHERE clause).
    pub async fn search_like<M: EntityKind>(
        &self,
        search_columns: &[&ColumnSpec],
        keyword: &str,
    ) -> AppResult<Vec<Entity<M>>> {
        if keyword.is_empty() {
            return self.fetch_all::<M>().await;
        }
        let table = M::table();
        let sql = template::select_where_like_any(table.name(), &all_columns::<M>(), search_columns);
        let pattern = format!("{keyword}%");
        let mut query = sqlx::query(&sql);
        for _ in search_columns {
            query = query.bind(pattern.clone());
        }
        self.note_query();
        let rows = query.fetch_all(self.pool()).await?;
        rows.iter().map(wrap_row::<M>).collect()
    }
}
