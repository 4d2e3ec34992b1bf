// ABOUTME: The driver seam - binds Values into sqlx queries, decodes rows back
// ABOUTME: All raw-type conversion happens here, once, per ValueType
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Typed binding between [`Value`] and the SQLite driver.
//!
//! Binding never casts an opaque object: each variant uses its native sqlx
//! encoding, with timestamps and dates stored as RFC 3339 / ISO-8601 text.
//! Decoding performs the inverse conversion per the column's declared
//! [`ValueType`], so representation mismatches are handled once, here, not
//! at each call site.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::Row;

use crate::errors::{AppError, AppResult};
use crate::schema::{ColumnData, ColumnSpec, EntityKind, Value, ValueType};

/// A parameterized SQLite query being bound
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind one value via its native encoding
#[must_use]
pub fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
    match value {
        Value::Text(s) => query.bind(s.clone()),
        Value::Integer(i) => query.bind(*i),
        Value::Real(r) => query.bind(*r),
        Value::Boolean(b) => query.bind(*b),
        Value::Timestamp(t) => query.bind(t.to_rfc3339()),
        Value::Date(d) => query.bind(d.format("%Y-%m-%d").to_string()),
    }
}

/// Bind a possibly-null value, typed so the driver sees the column's
/// declared type even for nulls
#[must_use]
pub fn bind_nullable<'q>(
    query: SqliteQuery<'q>,
    value_type: ValueType,
    value: Option<&Value>,
) -> SqliteQuery<'q> {
    match value {
        Some(value) => bind_value(query, value),
        None => match value_type {
            ValueType::Text | ValueType::Timestamp | ValueType::Date => {
                query.bind(Option::<String>::None)
            }
            ValueType::Integer => query.bind(Option::<i64>::None),
            ValueType::Real => query.bind(Option::<f64>::None),
            ValueType::Boolean => query.bind(Option::<bool>::None),
        },
    }
}

/// Bind a slice of values in order
#[must_use]
pub fn bind_values<'q>(mut query: SqliteQuery<'q>, values: &[Value]) -> SqliteQuery<'q> {
    for value in values {
        query = bind_value(query, value);
    }
    query
}

/// Decode one column of a result row by its declared type
pub fn decode_column(
    row: &SqliteRow,
    position: usize,
    column: &ColumnSpec,
) -> AppResult<Option<Value>> {
    let value = match column.value_type {
        ValueType::Text => row
            .try_get::<Option<String>, usize>(position)?
            .map(Value::Text),
        ValueType::Integer => row
            .try_get::<Option<i64>, usize>(position)?
            .map(Value::Integer),
        ValueType::Real => row
            .try_get::<Option<f64>, usize>(position)?
            .map(Value::Real),
        ValueType::Boolean => row
            .try_get::<Option<bool>, usize>(position)?
            .map(Value::Boolean),
        ValueType::Timestamp => row
            .try_get::<Option<String>, usize>(position)?
            .map(|raw| parse_timestamp(column, &raw))
            .transpose()?,
        ValueType::Date => row
            .try_get::<Option<String>, usize>(position)?
            .map(|raw| parse_date(column, &raw))
            .transpose()?,
    };
    Ok(value)
}

fn parse_timestamp(column: &ColumnSpec, raw: &str) -> AppResult<Value> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
        .map_err(|e| {
            AppError::type_cast(format!(
                "column '{}' holds '{raw}', not an RFC 3339 timestamp",
                column.name
            ))
            .with_source(e)
        })
}

fn parse_date(column: &ColumnSpec, raw: &str) -> AppResult<Value> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Value::Date)
        .map_err(|e| {
            AppError::type_cast(format!(
                "column '{}' holds '{raw}', not an ISO-8601 date",
                column.name
            ))
            .with_source(e)
        })
}

/// Decode a full row selected in table column order into a `ColumnData`
/// carrying every column
pub fn read_row<M: EntityKind>(row: &SqliteRow) -> AppResult<ColumnData<M>> {
    let mut data = ColumnData::<M>::carrying_all();
    for (position, column) in M::table().columns().iter().enumerate() {
        let value = decode_column(row, position, column)?;
        data.put_raw(column, value)?;
    }
    Ok(data)
}
