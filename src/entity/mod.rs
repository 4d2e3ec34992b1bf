// ABOUTME: Entity lifecycle wrapper - frozen ColumnData plus provenance
// ABOUTME: Construction validates schema coverage and the provenance/id invariant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Entity lifecycle wrapper.
//!
//! An [`Entity`] wraps one permanently frozen [`ColumnData`] with an
//! [`ObjectSource`] provenance tag and, for imported/restored data, the
//! pending natural-key lookups of foreign-key columns whose surrogate ids
//! are not yet known. Entities are never mutated in place; edits go through
//! an [`EntityDraft`] and produce a new entity.
//!
//! Construction enforces two invariants:
//! - every non-nullable column has a value (unless it is covered by a
//!   pending natural key) — violations are recoverable
//!   [`SchemaViolation`](crate::errors::ErrorCode::SchemaViolation) errors,
//!   since they mean upstream validation was skipped;
//! - the provenance tag agrees with id presence — a mismatch is a defect in
//!   the calling code and panics.

mod draft;
mod source;

pub use draft::EntityDraft;
pub use source::ObjectSource;

use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::schema::column::Column;
use crate::schema::column_data::ColumnData;
use crate::schema::table::EntityKind;
use crate::schema::value::{ColumnValue, Value};

/// Application-facing wrapper: frozen row data plus provenance
#[derive(Debug)]
pub struct Entity<M: EntityKind> {
    data: ColumnData<M>,
    source: ObjectSource,
    pending_fk: HashMap<&'static str, Value>,
}

impl<M: EntityKind> Entity<M> {
    /// Wrap and freeze row data under the given provenance
    pub fn new(data: ColumnData<M>, source: ObjectSource) -> AppResult<Self> {
        Self::with_pending(data, source, HashMap::new())
    }

    /// Wrap row data whose foreign keys may still be known only by a parent
    /// natural-key value; those columns are exempt from the non-nullable
    /// check until resolution rewrites them
    pub fn with_pending(
        mut data: ColumnData<M>,
        source: ObjectSource,
        pending_fk: HashMap<&'static str, Value>,
    ) -> AppResult<Self> {
        let exempt: Vec<&str> = pending_fk.keys().copied().collect();
        let missing = data.missing_required(&exempt);
        if !missing.is_empty() {
            return Err(AppError::schema_violation(M::TABLE, &missing));
        }
        assert_eq!(
            source.requires_id(),
            data.id().is_some(),
            "object source '{source}' and id presence disagree for table '{}'",
            M::TABLE
        );
        data.freeze();
        Ok(Self {
            data,
            source,
            pending_fk,
        })
    }

    /// Typed column read
    #[must_use]
    pub fn get<J: ColumnValue>(&self, column: &Column<M, J>) -> Option<J> {
        self.data.get(column)
    }

    /// The frozen row data
    #[must_use]
    pub const fn data(&self) -> &ColumnData<M> {
        &self.data
    }

    /// Provenance tag
    #[must_use]
    pub const fn source(&self) -> ObjectSource {
        self.source
    }

    /// Surrogate id, when assigned
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.data.id()
    }

    /// Whether a surrogate id has been assigned
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.data.id().is_some()
    }

    /// Pending foreign-key natural-key values, keyed by FK column name
    #[must_use]
    pub const fn pending_natural_keys(&self) -> &HashMap<&'static str, Value> {
        &self.pending_fk
    }

    /// Whether any foreign key still awaits natural-key resolution
    #[must_use]
    pub fn has_pending_fk(&self) -> bool {
        !self.pending_fk.is_empty()
    }
}

impl<M: EntityKind> Clone for Entity<M> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            source: self.source,
            pending_fk: self.pending_fk.clone(),
        }
    }
}

/// Structural equality over the row data, independent of provenance and
/// instance identity
impl<M: EntityKind> PartialEq for Entity<M> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
