// ABOUTME: Column descriptors - erased ColumnSpec metadata and typed Column handles
// ABOUTME: Const builder is the sole construction path for column metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Typed, immutable column descriptors.
//!
//! [`ColumnSpec`] is the erased, `'static` description of one table field;
//! [`Column<M, J>`] is the typed handle call sites use, tying the column to
//! its entity kind `M` and slot type `J` so the compiler enforces what the
//! original runtime casts only asserted. Specs are declared as statics with
//! the const builder and shared freely across threads; they are compared by
//! name within a table and never mutated after construction.

use std::marker::PhantomData;

use crate::schema::table::EntityKind;
use crate::schema::value::{ColumnValue, Value, ValueType};

/// Reference from a foreign-key column to a column in a parent table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignRef {
    /// Parent table name
    pub table: &'static str,
    /// Referenced column name in the parent table
    pub column: &'static str,
}

/// Erased description of one table field
#[derive(Debug)]
pub struct ColumnSpec {
    /// Column name, unique within its table
    pub name: &'static str,
    /// Stable position used for dense storage; `0..n` within a table
    pub index: usize,
    /// Declared value type
    pub value_type: ValueType,
    /// Whether edit flows may change this column
    pub editable: bool,
    /// Whether null is a legal stored value
    pub nullable: bool,
    /// Whether values must be unique across rows
    pub unique: bool,
    /// Whether the column participates in the table's secondary key
    pub in_secondary_key: bool,
    /// Default value supplier for create drafts
    pub default: Option<fn() -> Value>,
    /// Parent reference, present only on foreign-key columns
    pub references: Option<ForeignRef>,
}

impl ColumnSpec {
    /// Start a column declaration; editable, non-nullable by default
    #[must_use]
    pub const fn new(name: &'static str, index: usize, value_type: ValueType) -> Self {
        Self {
            name,
            index,
            value_type,
            editable: true,
            nullable: false,
            unique: false,
            in_secondary_key: false,
            default: None,
            references: None,
        }
    }

    /// Null becomes a legal stored value
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Exclude the column from edit flows (id, bookkeeping timestamps)
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Values must be unique across rows; a single unique non-id column
    /// becomes the table's natural key
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// The column participates in the table's secondary key
    #[must_use]
    pub const fn secondary_key(mut self) -> Self {
        self.in_secondary_key = true;
        self
    }

    /// Default value supplier used when seeding create drafts
    #[must_use]
    pub const fn with_default(mut self, supplier: fn() -> Value) -> Self {
        self.default = Some(supplier);
        self
    }

    /// Mark as a foreign key referencing `table.column`
    #[must_use]
    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignRef { table, column });
        self
    }

    /// Whether this column is a foreign key
    #[must_use]
    pub const fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }
}

/// Typed handle to a column of entity kind `M` holding values of type `J`
pub struct Column<M: EntityKind, J: ColumnValue> {
    spec: &'static ColumnSpec,
    _marker: PhantomData<fn() -> (M, J)>,
}

impl<M: EntityKind, J: ColumnValue> Column<M, J> {
    /// Wrap a spec in a typed handle.
    ///
    /// Evaluated in static initializers, so a value-type mismatch between
    /// the spec and `J` fails at compile time.
    #[must_use]
    pub const fn new(spec: &'static ColumnSpec) -> Self {
        assert!(
            spec.value_type.same(J::VALUE_TYPE),
            "column value type does not match its typed handle"
        );
        Self {
            spec,
            _marker: PhantomData,
        }
    }

    /// The erased descriptor
    #[must_use]
    pub const fn spec(&self) -> &'static ColumnSpec {
        self.spec
    }

    /// Column name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Stable position within the table
    #[must_use]
    pub const fn index(&self) -> usize {
        self.spec.index
    }
}

impl<M: EntityKind, J: ColumnValue> Clone for Column<M, J> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: EntityKind, J: ColumnValue> Copy for Column<M, J> {}

impl<M: EntityKind, J: ColumnValue> std::fmt::Debug for Column<M, J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column({}.{})", M::TABLE, self.spec.name)
    }
}
