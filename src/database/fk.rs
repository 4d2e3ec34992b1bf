// ABOUTME: Natural-key resolution - rewrites pending foreign keys into surrogate ids
// ABOUTME: One batched IN-query per foreign-key column, per-entity failure reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::Database;
use crate::entity::Entity;
use crate::errors::{AppError, AppResult};
use crate::schema::{ColumnSpec, EntityKind, Value};
use crate::sql::{bind, template};

/// One entity excluded from resolution: which foreign-key column failed
/// and the natural-key value that matched no parent row
#[derive(Debug)]
pub struct FkFailure<M: EntityKind> {
    /// The entity still carrying its pending natural keys
    pub entity: Entity<M>,
    /// Foreign-key column that could not be resolved
    pub column: &'static str,
    /// Natural-key value with no matching parent
    pub value: Value,
}

/// Result of resolving a batch: entities whose foreign keys now hold
/// surrogate ids, and entities excluded with the offending reference
#[derive(Debug)]
pub struct FkOutcome<M: EntityKind> {
    /// Entities with every foreign key rewritten to a surrogate id
    pub resolved: Vec<Entity<M>>,
    /// Entities with at least one unmatched natural key
    pub failed: Vec<FkFailure<M>>,
}

/// Per foreign-key column: the parent natural-key values seen in the
/// batch, deduplicated by raw representation
fn collect_lookups<M: EntityKind>(entities: &[Entity<M>]) -> Vec<(&'static str, Vec<Value>)> {
    let mut order: Vec<&'static str> = Vec::new();
    let mut values: HashMap<&'static str, (HashSet<String>, Vec<Value>)> = HashMap::new();
    for entity in entities {
        for (&column, value) in entity.pending_natural_keys() {
            let (seen, distinct) = values.entry(column).or_insert_with(|| {
                order.push(column);
                (HashSet::new(), Vec::new())
            });
            if seen.insert(value.to_raw_string()) {
                distinct.push(value.clone());
            }
        }
    }
    order
        .into_iter()
        .map(|column| (column, values.remove(column).map(|(_, v)| v).unwrap_or_default()))
        .collect()
}

impl Database {
    /// Rewrite pending natural-key references into surrogate ids.
    ///
    /// Issues one batched lookup per foreign-key column regardless of batch
    /// size. A natural-key value with no matching parent row excludes that
    /// entity and is reported in the outcome; the rest of the batch
    /// proceeds. A foreign key whose parent table declares no natural key
    /// cannot be resolved at all and fails the whole call.
    pub async fn resolve_natural_keys<M: EntityKind>(
        &self,
        entities: Vec<Entity<M>>,
    ) -> AppResult<FkOutcome<M>> {
        let table = M::table();
        let lookups = collect_lookups(&entities);

        // raw natural-key value -> parent surrogate id, per FK column
        let mut id_maps: HashMap<&'static str, HashMap<String, i64>> = HashMap::new();
        for (column_name, values) in lookups {
            let column = table.column(column_name).unwrap_or_else(|| {
                panic!(
                    "pending key names unknown column '{column_name}' of '{}'",
                    M::TABLE
                )
            });
            let fk = column.references.unwrap_or_else(|| {
                panic!(
                    "pending key on non-foreign-key column '{column_name}' of '{}'",
                    M::TABLE
                )
            });
            let parent = self.registry().table(fk.table).ok_or_else(|| {
                AppError::fk_resolution(format!(
                    "table '{}' references unregistered table '{}'",
                    M::TABLE,
                    fk.table
                ))
            })?;
            let natural = parent.natural_key.ok_or_else(|| {
                AppError::fk_resolution(format!(
                    "table '{}' has no natural key; '{}.{}' cannot be resolved by value",
                    parent.name,
                    M::TABLE,
                    column_name
                ))
            })?;

            let id_column = &parent.columns[0];
            let selected: Vec<&ColumnSpec> = vec![id_column, natural];
            let sql =
                template::select_where_in(parent.name, &selected, natural, values.len());
            self.note_query();
            let rows = bind::bind_values(sqlx::query(&sql), &values)
                .fetch_all(self.pool())
                .await?;

            let mut map = HashMap::with_capacity(rows.len());
            for row in &rows {
                let id = match bind::decode_column(row, 0, id_column)? {
                    Some(Value::Integer(id)) => id,
                    other => {
                        return Err(AppError::internal(format!(
                            "id column of '{}' decoded as {other:?}",
                            parent.name
                        )))
                    }
                };
                let key = bind::decode_column(row, 1, natural)?.ok_or_else(|| {
                    AppError::internal(format!(
                        "natural key '{}.{}' decoded as null",
                        parent.name, natural.name
                    ))
                })?;
                map.insert(key.to_raw_string(), id);
            }
            debug!(
                table = M::TABLE,
                column = column_name,
                requested = values.len(),
                matched = map.len(),
                "natural keys looked up"
            );
            id_maps.insert(column_name, map);
        }

        let mut resolved = Vec::with_capacity(entities.len());
        let mut failed = Vec::new();
        for entity in entities {
            if !entity.has_pending_fk() {
                resolved.push(entity);
                continue;
            }
            let mut data = entity.data().copy();
            let mut unmatched: Option<(&'static str, Value)> = None;
            for (&column_name, value) in entity.pending_natural_keys() {
                let id = id_maps
                    .get(column_name)
                    .and_then(|map| map.get(&value.to_raw_string()));
                match id {
                    Some(id) => {
                        let column = table
                            .column(column_name)
                            .expect("lookup pass validated the column");
                        data.put_raw(column, Some(Value::Integer(*id)))?;
                    }
                    None => {
                        warn!(
                            table = M::TABLE,
                            column = column_name,
                            value = %value.to_raw_string(),
                            "natural key matched no parent row"
                        );
                        unmatched = Some((column_name, value.clone()));
                        break;
                    }
                }
            }
            match unmatched {
                Some((column, value)) => failed.push(FkFailure {
                    entity,
                    column,
                    value,
                }),
                None => {
                    resolved.push(Entity::with_pending(data, entity.source(), HashMap::new())?);
                }
            }
        }

        Ok(FkOutcome { resolved, failed })
    }
}
