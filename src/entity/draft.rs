// ABOUTME: EntityDraft - mutable builder producing new entities
// ABOUTME: Seeds from column defaults (create) or an existing entity (edit)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use crate::entity::{Entity, ObjectSource};
use crate::errors::{AppError, AppResult};
use crate::schema::column::{Column, ColumnSpec};
use crate::schema::column_data::ColumnData;
use crate::schema::table::EntityKind;
use crate::schema::value::ColumnValue;

/// Mutable draft for interactive create/edit flows.
///
/// A draft validates per column without committing; [`EntityDraft::build`]
/// only constructs an entity once every settable column holds a valid
/// value. Entities themselves stay immutable — an edit drafts a copy and
/// builds a new entity with `DbEdit` provenance.
#[derive(Debug, Clone)]
pub struct EntityDraft<M: EntityKind> {
    data: ColumnData<M>,
    source: ObjectSource,
}

impl<M: EntityKind> EntityDraft<M> {
    /// Draft a new entity, seeding column defaults; builds with `UserNew`
    /// provenance
    #[must_use]
    pub fn create() -> Self {
        let mut data = ColumnData::carrying_all();
        for column in M::table().columns() {
            if let Some(supplier) = column.default {
                // Defaults are declared with the column's own type.
                data.put_raw(column, Some(supplier()))
                    .unwrap_or_else(|e| panic!("default value rejected: {e}"));
            }
        }
        Self {
            data,
            source: ObjectSource::UserNew,
        }
    }

    /// Draft an edit of a persisted entity; builds with `DbEdit` provenance.
    /// Drafting an edit of an unpersisted entity is a defect and panics.
    #[must_use]
    pub fn edit(entity: &Entity<M>) -> Self {
        assert!(
            entity.source().is_persisted(),
            "cannot edit an entity with source '{}'",
            entity.source()
        );
        Self {
            data: entity.data().copy(),
            source: ObjectSource::DbEdit,
        }
    }

    /// Set a typed column value.
    ///
    /// Rejects writes to non-editable columns and nulls on non-nullable
    /// columns with recoverable errors; the draft is left unchanged.
    pub fn set<J: ColumnValue>(
        &mut self,
        column: &Column<M, J>,
        value: Option<J>,
    ) -> AppResult<()> {
        self.check_settable(column.spec(), value.is_none())?;
        self.data.put(column, value);
        Ok(())
    }

    /// Set a column from its text representation, the interactive-prompt
    /// path; empty text means null
    pub fn set_str(&mut self, name: &str, raw: &str) -> AppResult<()> {
        let column = M::table()
            .column(name)
            .ok_or_else(|| {
                AppError::invalid_input(format!("table '{}' has no column '{name}'", M::TABLE))
            })?;
        let value = column.value_type.parse_str(raw)?;
        self.check_settable(column, value.is_none())?;
        self.data.put_raw(column, value)
    }

    fn check_settable(&self, column: &ColumnSpec, clearing: bool) -> AppResult<()> {
        if !column.editable {
            return Err(AppError::invalid_input(format!(
                "column '{}.{}' is not editable",
                M::TABLE,
                column.name
            )));
        }
        if clearing && !column.nullable {
            return Err(AppError::invalid_input(format!(
                "column '{}.{}' cannot be empty",
                M::TABLE,
                column.name
            )));
        }
        Ok(())
    }

    /// Names of required columns still lacking a value
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        self.data.missing_required(&[])
    }

    /// Construct the entity; fails with a schema violation while required
    /// columns are missing
    pub fn build(self) -> AppResult<Entity<M>> {
        Entity::new(self.data, self.source)
    }
}
