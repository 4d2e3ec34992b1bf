// ABOUTME: Typed schema metadata - columns, tables, values, and row storage
// ABOUTME: The descriptor layer everything else in the persistence core consumes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Typed schema metadata: column and table descriptors, value conversions,
//! and the per-row [`ColumnData`] store.

pub mod column;
pub mod column_data;
pub mod table;
pub mod value;

pub use column::{Column, ColumnSpec, ForeignRef};
pub use column_data::ColumnData;
pub use table::{EntityKind, SchemaRegistry, Table, TableInfo};
pub use value::{ColumnValue, Value, ValueType};
