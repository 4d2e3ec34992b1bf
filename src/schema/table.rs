// ABOUTME: Table descriptors with derived column views and startup validation
// ABOUTME: EntityKind trait, Table<M>, erased TableInfo, and the SchemaRegistry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Table descriptors.
//!
//! A [`Table`] is the ordered, immutable column list of one entity kind plus
//! derived, cached views (id/time columns, name map, foreign keys, secondary
//! key, optional natural key). Tables are constructed once per process as
//! `LazyLock` statics behind [`EntityKind::table`]; the [`SchemaRegistry`] is
//! the explicit object handed to the persistence layer, collecting the erased
//! view of every table for DDL generation and cross-table validation.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::errors::{AppError, AppResult};
use crate::schema::column::ColumnSpec;
use crate::schema::value::ValueType;

/// Index of the surrogate id column in every table
pub const ID_INDEX: usize = 0;
/// Index of the creation timestamp column in every table
pub const CREATED_INDEX: usize = 1;
/// Index of the modification timestamp column in every table
pub const MODIFIED_INDEX: usize = 2;

/// One persistable entity kind and its table metadata.
///
/// Implementations are zero-sized marker types; `table()` returns the
/// process-wide singleton, constructed lazily and never mutated after.
pub trait EntityKind: Sized + Send + Sync + 'static {
    /// Table name in the relational store
    const TABLE: &'static str;

    /// The ordered column declarations
    fn columns() -> &'static [ColumnSpec];

    /// The validated singleton table descriptor
    fn table() -> &'static Table<Self>;
}

/// Ordered, immutable column set for entity kind `M` with derived views
pub struct Table<M: EntityKind> {
    columns: &'static [ColumnSpec],
    by_name: HashMap<&'static str, usize>,
    foreign_keys: Vec<usize>,
    secondary_key: Vec<usize>,
    natural_key: Option<usize>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: EntityKind> Table<M> {
    /// Build and validate the table descriptor from `M`'s declarations.
    ///
    /// Fails if column names repeat, indices are not the dense range `0..n`,
    /// the first three columns are not `id`/`created_at`/`modified_at`, or
    /// more than one non-id column is declared unique (ambiguous natural
    /// key). Cross-table checks on foreign keys, including that a reference
    /// matches its target column's value type, need the parent's descriptor
    /// and therefore run at [`SchemaRegistry::register`], still before any
    /// row is touched. Called once at startup; failure is a metadata defect.
    pub fn build() -> AppResult<Self> {
        let columns = M::columns();
        let table = M::TABLE;

        if columns.len() < 3 {
            return Err(AppError::internal(format!(
                "table '{table}' must declare at least id, created_at and modified_at"
            )));
        }

        let mut by_name = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if column.index != position {
                return Err(AppError::internal(format!(
                    "table '{table}' column '{}' declares index {} at position {position}",
                    column.name, column.index
                )));
            }
            if by_name.insert(column.name, position).is_some() {
                return Err(AppError::internal(format!(
                    "table '{table}' declares column '{}' twice",
                    column.name
                )));
            }
        }

        Self::check_fixed(table, &columns[ID_INDEX], "id", ValueType::Integer)?;
        Self::check_fixed(
            table,
            &columns[CREATED_INDEX],
            "created_at",
            ValueType::Timestamp,
        )?;
        Self::check_fixed(
            table,
            &columns[MODIFIED_INDEX],
            "modified_at",
            ValueType::Timestamp,
        )?;

        let foreign_keys: Vec<usize> = columns
            .iter()
            .filter(|c| c.is_foreign_key())
            .map(|c| c.index)
            .collect();
        let secondary_key: Vec<usize> = columns
            .iter()
            .filter(|c| c.in_secondary_key)
            .map(|c| c.index)
            .collect();

        let unique: Vec<usize> = columns
            .iter()
            .skip(1)
            .filter(|c| c.unique)
            .map(|c| c.index)
            .collect();
        let natural_key = match unique.as_slice() {
            [] => None,
            [index] => Some(*index),
            many => {
                let names: Vec<&str> = many.iter().map(|i| columns[*i].name).collect();
                return Err(AppError::internal(format!(
                    "table '{table}' has an ambiguous natural key: {}",
                    names.join(", ")
                )));
            }
        };

        Ok(Self {
            columns,
            by_name,
            foreign_keys,
            secondary_key,
            natural_key,
            _marker: PhantomData,
        })
    }

    fn check_fixed(
        table: &str,
        column: &ColumnSpec,
        name: &str,
        value_type: ValueType,
    ) -> AppResult<()> {
        if column.name != name || column.value_type != value_type || column.editable {
            return Err(AppError::internal(format!(
                "table '{table}' column {} must be read-only '{name}' of type {value_type:?}",
                column.index
            )));
        }
        Ok(())
    }

    /// Table name
    #[must_use]
    pub fn name(&self) -> &'static str {
        M::TABLE
    }

    /// All columns in declaration order
    #[must_use]
    pub const fn columns(&self) -> &'static [ColumnSpec] {
        self.columns
    }

    /// Number of columns
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no columns are declared; never the case for a valid table
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The surrogate id column
    #[must_use]
    pub fn id_column(&self) -> &'static ColumnSpec {
        &self.columns[ID_INDEX]
    }

    /// The creation timestamp column
    #[must_use]
    pub fn created_column(&self) -> &'static ColumnSpec {
        &self.columns[CREATED_INDEX]
    }

    /// The modification timestamp column
    #[must_use]
    pub fn modified_column(&self) -> &'static ColumnSpec {
        &self.columns[MODIFIED_INDEX]
    }

    /// Look up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.by_name.get(name).map(|i| &self.columns[*i])
    }

    /// Foreign-key columns in declaration order
    pub fn foreign_keys(&self) -> impl Iterator<Item = &'static ColumnSpec> + '_ {
        self.foreign_keys.iter().map(|i| &self.columns[*i])
    }

    /// Secondary-key columns in declaration order
    pub fn secondary_key(&self) -> impl Iterator<Item = &'static ColumnSpec> + '_ {
        self.secondary_key.iter().map(|i| &self.columns[*i])
    }

    /// The single unique non-id column, if the table declares exactly one
    #[must_use]
    pub fn natural_key(&self) -> Option<&'static ColumnSpec> {
        self.natural_key.map(|i| &self.columns[i])
    }

    /// Erased view for the registry
    #[must_use]
    pub fn info(&self) -> TableInfo {
        TableInfo {
            name: M::TABLE,
            columns: self.columns,
            natural_key: self.natural_key(),
        }
    }
}

/// Erased table view used by DDL generation and cross-table lookups
#[derive(Debug, Clone, Copy)]
pub struct TableInfo {
    /// Table name
    pub name: &'static str,
    /// Ordered columns
    pub columns: &'static [ColumnSpec],
    /// Single-column natural key, if declared
    pub natural_key: Option<&'static ColumnSpec>,
}

impl TableInfo {
    /// Look up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Explicit registry of every table in the schema.
///
/// Constructed once at process start and passed to the persistence layer;
/// registration validates foreign-key references across tables (target
/// exists, value types match, target is the parent id or a unique column).
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableInfo>,
    by_name: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity kind; insertion order is the DDL creation order,
    /// so parents must be registered before their children
    pub fn register<M: EntityKind>(&mut self) -> AppResult<()> {
        let info = M::table().info();
        if self.by_name.contains_key(info.name) {
            return Err(AppError::internal(format!(
                "table '{}' registered twice",
                info.name
            )));
        }
        for column in info.columns.iter().filter(|c| c.is_foreign_key()) {
            let fk = column.references.unwrap_or_else(|| {
                panic!("foreign-key column '{}' lost its reference", column.name)
            });
            let parent = self.table(fk.table).ok_or_else(|| {
                AppError::internal(format!(
                    "table '{}' column '{}' references unregistered table '{}'",
                    info.name, column.name, fk.table
                ))
            })?;
            let target = parent.column(fk.column).ok_or_else(|| {
                AppError::internal(format!(
                    "table '{}' column '{}' references missing column '{}.{}'",
                    info.name, column.name, fk.table, fk.column
                ))
            })?;
            if target.value_type != column.value_type {
                return Err(AppError::internal(format!(
                    "foreign key '{}.{}' and parent column '{}.{}' disagree on value type",
                    info.name, column.name, fk.table, fk.column
                )));
            }
            if target.index != ID_INDEX && !target.unique {
                return Err(AppError::internal(format!(
                    "foreign key '{}.{}' must reference the parent id or a unique column",
                    info.name, column.name
                )));
            }
        }
        self.by_name.insert(info.name, self.tables.len());
        self.tables.push(info);
        Ok(())
    }

    /// Look up a table by name
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.by_name.get(name).map(|i| &self.tables[*i])
    }

    /// All registered tables in registration order
    #[must_use]
    pub fn tables(&self) -> &[TableInfo] {
        &self.tables
    }
}
