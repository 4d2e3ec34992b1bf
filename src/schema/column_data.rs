// ABOUTME: ColumnData - the typed, per-instance dense row store keyed by column
// ABOUTME: Slot sum type replaces the value-array-plus-bitmap pair of the ancestry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Typed dynamic row store.
//!
//! A [`ColumnData`] holds one row's values in a dense vector sized to its
//! table's column count. Each slot is a sum type: not carried by this
//! instance, carried but null, or filled. Not every instance carries every
//! column (a natural-key lookup populates a single column), and writes stop
//! permanently once the instance is frozen by an entity wrapper.
//!
//! Reading an uncarried column or writing a frozen instance is a defect in
//! the calling code and panics; it is never a recoverable error.

use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::errors::{AppError, AppResult};
use crate::schema::column::{Column, ColumnSpec};
use crate::schema::table::{EntityKind, ID_INDEX};
use crate::schema::value::{ColumnValue, Value};

/// One column slot of a row instance
#[derive(Debug, Clone, PartialEq, Hash)]
enum Slot {
    /// The column is not part of this instance's carried subset
    NotCarried,
    /// Carried, no value stored
    Null,
    /// Carried with a value
    Filled(Value),
}

/// Per-instance typed value store for entity kind `M`
#[derive(Debug)]
pub struct ColumnData<M: EntityKind> {
    slots: Vec<Slot>,
    frozen: bool,
    _marker: PhantomData<fn() -> M>,
}

impl<M: EntityKind> ColumnData<M> {
    /// New mutable instance carrying every column of the table, all null
    #[must_use]
    pub fn carrying_all() -> Self {
        Self {
            slots: vec![Slot::Null; M::table().len()],
            frozen: false,
            _marker: PhantomData,
        }
    }

    /// New mutable instance carrying only the given columns
    #[must_use]
    pub fn carrying(columns: &[&ColumnSpec]) -> Self {
        let mut slots = vec![Slot::NotCarried; M::table().len()];
        for column in columns {
            slots[column.index] = Slot::Null;
        }
        Self {
            slots,
            frozen: false,
            _marker: PhantomData,
        }
    }

    /// Typed read. Panics if the column is not carried by this instance.
    #[must_use]
    pub fn get<J: ColumnValue>(&self, column: &Column<M, J>) -> Option<J> {
        match self.get_raw(column.spec()) {
            None => None,
            Some(value) => Some(J::from_value(value).unwrap_or_else(|| {
                panic!(
                    "column '{}.{}' slot holds {:?}, not its declared type",
                    M::TABLE,
                    column.name(),
                    value.value_type()
                )
            })),
        }
    }

    /// Erased read. Panics if the column is not carried by this instance.
    #[must_use]
    pub fn get_raw(&self, column: &ColumnSpec) -> Option<&Value> {
        match &self.slots[column.index] {
            Slot::NotCarried => panic!(
                "column '{}.{}' is not carried by this instance",
                M::TABLE,
                column.name
            ),
            Slot::Null => None,
            Slot::Filled(value) => Some(value),
        }
    }

    /// Typed write. Panics if the instance is frozen or the column is not
    /// carried.
    pub fn put<J: ColumnValue>(&mut self, column: &Column<M, J>, value: Option<J>) {
        let value = value.map(ColumnValue::into_value);
        // The typed handle guarantees the variant matches the declared type.
        self.put_raw(column.spec(), value)
            .unwrap_or_else(|e| panic!("typed put rejected: {e}"));
    }

    /// Erased write with a runtime type check; a variant mismatch is a
    /// recoverable `TypeCast` error (raw values arrive from drivers and
    /// text sources). Panics if frozen or not carried.
    pub fn put_raw(&mut self, column: &ColumnSpec, value: Option<Value>) -> AppResult<()> {
        assert!(
            !self.frozen,
            "write to frozen row of table '{}'",
            M::TABLE
        );
        assert!(
            !matches!(self.slots[column.index], Slot::NotCarried),
            "column '{}.{}' is not carried by this instance",
            M::TABLE,
            column.name
        );
        self.slots[column.index] = match value {
            None => Slot::Null,
            Some(value) => {
                if value.value_type() != column.value_type {
                    return Err(AppError::type_cast(format!(
                        "column '{}.{}' declares {:?} but received {:?}",
                        M::TABLE,
                        column.name,
                        column.value_type,
                        value.value_type()
                    )));
                }
                Slot::Filled(value)
            }
        };
        Ok(())
    }

    /// True iff a non-null value has been stored for the column
    #[must_use]
    pub fn has_data(&self, column: &ColumnSpec) -> bool {
        matches!(self.slots[column.index], Slot::Filled(_))
    }

    /// True iff the column is part of this instance's carried subset
    #[must_use]
    pub fn carries(&self, column: &ColumnSpec) -> bool {
        !matches!(self.slots[column.index], Slot::NotCarried)
    }

    /// Freeze permanently; all further writes panic
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the instance has been frozen
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Independent mutable copy carrying the same subset with the same values
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            frozen: false,
            _marker: PhantomData,
        }
    }

    /// Independent mutable copy carrying only the given subset; values of
    /// carried source columns are copied, others start null
    #[must_use]
    pub fn copy_columns(&self, columns: &[&ColumnSpec]) -> Self {
        let mut slots = vec![Slot::NotCarried; self.slots.len()];
        for column in columns {
            slots[column.index] = match &self.slots[column.index] {
                Slot::NotCarried => Slot::Null,
                carried => carried.clone(),
            };
        }
        Self {
            slots,
            frozen: false,
            _marker: PhantomData,
        }
    }

    /// The surrogate id, when carried and filled
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match &self.slots[ID_INDEX] {
            Slot::Filled(Value::Integer(id)) => Some(*id),
            _ => None,
        }
    }

    /// Names of non-nullable columns without a value, excluding the id and
    /// bookkeeping timestamps (those are governed by provenance and the
    /// store) and any column named in `exempt`
    #[must_use]
    pub fn missing_required(&self, exempt: &[&str]) -> Vec<&'static str> {
        M::table()
            .columns()
            .iter()
            .skip(3)
            .filter(|c| !c.nullable && !self.has_data(c) && !exempt.contains(&c.name))
            .map(|c| c.name)
            .collect()
    }

    /// Name → text map over the carried columns; null renders as the empty
    /// string. The sole contract with text-based export collaborators.
    #[must_use]
    pub fn to_string_map(&self) -> std::collections::HashMap<String, String> {
        M::table()
            .columns()
            .iter()
            .filter(|c| self.carries(c))
            .map(|c| {
                let text = self
                    .get_raw(c)
                    .map(Value::to_raw_string)
                    .unwrap_or_default();
                (c.name.to_owned(), text)
            })
            .collect()
    }
}

impl<M: EntityKind> Clone for ColumnData<M> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            frozen: self.frozen,
            _marker: PhantomData,
        }
    }
}

/// Structural equality over table identity plus the full slot vector; the
/// frozen flag is transient state and does not participate
impl<M: EntityKind> PartialEq for ColumnData<M> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<M: EntityKind> Hash for ColumnData<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        M::TABLE.hash(state);
        self.slots.hash(state);
    }
}
