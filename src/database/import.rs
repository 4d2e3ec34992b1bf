// ABOUTME: Text-import boundary - name/string row maps become Import entities
// ABOUTME: Foreign-key text arrives as parent natural keys, captured for resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::collections::HashMap;

use tracing::{debug, warn};

use super::Database;
use crate::entity::{Entity, ObjectSource};
use crate::errors::{AppError, AppResult};
use crate::schema::table::{CREATED_INDEX, ID_INDEX, MODIFIED_INDEX};
use crate::schema::{ColumnData, EntityKind, SchemaRegistry, Value};

/// One row excluded from an import batch
#[derive(Debug)]
pub struct ImportFailure {
    /// Zero-based position of the row in the batch
    pub row: usize,
    /// What was wrong with it
    pub error: AppError,
}

/// Result of turning text rows into import entities: survivors plus the
/// rows rejected with their reasons
#[derive(Debug)]
pub struct ImportOutcome<M: EntityKind> {
    /// Entities built from well-formed rows, foreign keys still pending
    pub entities: Vec<Entity<M>>,
    /// Rows rejected with the error that excluded them
    pub failed: Vec<ImportFailure>,
}

fn entity_from_row<M: EntityKind>(
    registry: &SchemaRegistry,
    row: &HashMap<String, String>,
) -> AppResult<Entity<M>> {
    let table = M::table();
    let mut data = ColumnData::<M>::carrying_all();
    let mut pending: HashMap<&'static str, Value> = HashMap::new();

    for column in table.columns() {
        if matches!(column.index, ID_INDEX | CREATED_INDEX | MODIFIED_INDEX) {
            continue;
        }
        let raw = row.get(column.name).map(String::as_str);

        if let Some(fk) = column.references {
            // Foreign-key text holds the parent's natural key, not an id;
            // parse it as the key's type and defer the id lookup.
            let Some(raw) = raw.filter(|r| !r.is_empty()) else {
                continue;
            };
            let parent = registry.table(fk.table).ok_or_else(|| {
                AppError::fk_resolution(format!(
                    "table '{}' references unregistered table '{}'",
                    M::TABLE,
                    fk.table
                ))
            })?;
            let natural = parent.natural_key.ok_or_else(|| {
                AppError::fk_resolution(format!(
                    "table '{}' has no natural key; column '{}' cannot be imported by value",
                    parent.name, column.name
                ))
            })?;
            let value = natural.value_type.parse_str(raw)?.ok_or_else(|| {
                AppError::invalid_input(format!("column '{}' holds a blank key", column.name))
            })?;
            pending.insert(column.name, value);
            continue;
        }

        match raw {
            Some(raw) => {
                let value = column.value_type.parse_str(raw).map_err(|e| {
                    AppError::type_cast(format!("column '{}' rejected its value", column.name))
                        .with_source(e)
                })?;
                data.put_raw(column, value)?;
            }
            // Column absent from the row entirely: fall back to its default
            None => {
                if let Some(supplier) = column.default {
                    data.put_raw(column, Some(supplier()))?;
                }
            }
        }
    }

    Entity::with_pending(data, ObjectSource::Import, pending)
}

impl Database {
    /// Turn name→text row maps into `Import` entities.
    ///
    /// Each row parses independently; a malformed value rejects that row
    /// and the batch continues. Foreign-key columns are captured as pending
    /// natural keys for [`resolve_natural_keys`](Database::resolve_natural_keys)
    /// rather than parsed as ids. Issues no SQL.
    pub fn import_rows<M: EntityKind>(
        &self,
        rows: &[HashMap<String, String>],
    ) -> ImportOutcome<M> {
        let mut entities = Vec::with_capacity(rows.len());
        let mut failed = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            match entity_from_row::<M>(self.registry(), row) {
                Ok(entity) => entities.push(entity),
                Err(error) => {
                    warn!(table = M::TABLE, row = index, %error, "import row rejected");
                    failed.push(ImportFailure { row: index, error });
                }
            }
        }
        debug!(
            table = M::TABLE,
            accepted = entities.len(),
            rejected = failed.len(),
            "import rows parsed"
        );
        ImportOutcome { entities, failed }
    }
}
