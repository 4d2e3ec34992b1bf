// ABOUTME: Value and ValueType sum types with string/raw conversion rules
// ABOUTME: ColumnValue trait binding Rust types to column value types at compile time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Column value types and their conversion rules.
//!
//! Every column declares a [`ValueType`]; every stored value is a [`Value`].
//! Conversions to and from text (`parse_str` / `to_raw_string`) are the sole
//! contract with text-based import/export collaborators: an empty string
//! represents null, timestamps are RFC 3339, dates are ISO-8601. The driver
//! seam (`crate::sql::bind`) performs the equivalent raw conversions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::errors::{AppError, AppResult};

/// Declared type of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Integer,
    Real,
    Boolean,
    Timestamp,
    Date,
}

impl ValueType {
    /// Const-context equality, usable from `Column::new` assertions
    #[must_use]
    pub const fn same(self, other: Self) -> bool {
        self as u8 == other as u8
    }

    /// SQL type name used in generated DDL
    #[must_use]
    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "DATETIME",
            Self::Date => "DATE",
        }
    }

    /// Parse a value from its text representation.
    ///
    /// An empty string represents null. Malformed input is a recoverable
    /// `TypeCast` error so batch imports can continue past unaffected rows.
    pub fn parse_str(self, raw: &str) -> AppResult<Option<Value>> {
        if raw.is_empty() {
            return Ok(None);
        }
        let value = match self {
            Self::Text => Value::Text(raw.to_owned()),
            Self::Integer => Value::Integer(raw.parse::<i64>().map_err(|e| {
                AppError::type_cast(format!("'{raw}' is not an integer")).with_source(e)
            })?),
            Self::Real => Value::Real(raw.parse::<f64>().map_err(|e| {
                AppError::type_cast(format!("'{raw}' is not a number")).with_source(e)
            })?),
            Self::Boolean => match raw {
                "true" | "1" => Value::Boolean(true),
                "false" | "0" => Value::Boolean(false),
                _ => {
                    return Err(AppError::type_cast(format!("'{raw}' is not a boolean")));
                }
            },
            Self::Timestamp => Value::Timestamp(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| {
                        AppError::type_cast(format!("'{raw}' is not an RFC 3339 timestamp"))
                            .with_source(e)
                    })?
                    .with_timezone(&Utc),
            ),
            Self::Date => Value::Date(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(
                |e| {
                    AppError::type_cast(format!("'{raw}' is not an ISO-8601 date")).with_source(e)
                },
            )?),
        };
        Ok(Some(value))
    }
}

/// One stored column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

impl Value {
    /// The declared type this value belongs to
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::Date(_) => ValueType::Date,
        }
    }

    /// Text representation, the inverse of [`ValueType::parse_str`]
    #[must_use]
    pub fn to_raw_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Real(r) => r.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Timestamp(t) => t.to_rfc3339(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Text(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Real(r) => r.to_bits().hash(state),
            Self::Boolean(b) => b.hash(state),
            Self::Timestamp(t) => t.timestamp_nanos_opt().hash(state),
            Self::Date(d) => d.hash(state),
        }
    }
}

/// Rust types that can occupy a typed column slot.
///
/// The trait ties a `Column<M, J>` handle to the `ValueType` of its slot at
/// compile time; a variant mismatch on read is therefore a defect in column
/// declarations, not a recoverable condition.
pub trait ColumnValue: Sized + Clone + Send + Sync + 'static {
    /// The value type every column of this Rust type declares
    const VALUE_TYPE: ValueType;

    /// Extract a typed value; `None` on variant mismatch
    fn from_value(value: &Value) -> Option<Self>;

    /// Wrap into the stored representation
    fn into_value(self) -> Value;
}

impl ColumnValue for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl ColumnValue for i64 {
    const VALUE_TYPE: ValueType = ValueType::Integer;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl ColumnValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Real;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Real(self)
    }
}

impl ColumnValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Boolean;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl ColumnValue for DateTime<Utc> {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl ColumnValue for NaiveDate {
    const VALUE_TYPE: ValueType = ValueType::Date;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Date(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn text_round_trips() {
        let v = Value::Text("egg".into());
        let parsed = ValueType::Text.parse_str(&v.to_raw_string()).unwrap();
        assert_eq!(parsed, Some(v));
    }

    #[test]
    fn numeric_round_trips() {
        for v in [Value::Integer(42), Value::Integer(-7)] {
            let parsed = ValueType::Integer.parse_str(&v.to_raw_string()).unwrap();
            assert_eq!(parsed, Some(v));
        }
        for v in [Value::Real(0.5), Value::Real(-123.25)] {
            let parsed = ValueType::Real.parse_str(&v.to_raw_string()).unwrap();
            assert_eq!(parsed, Some(v));
        }
    }

    #[test]
    fn timestamp_round_trips_with_sub_second_precision() {
        let t = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
            + chrono::Duration::nanoseconds(589_793_000);
        let v = Value::Timestamp(t);
        let parsed = ValueType::Timestamp.parse_str(&v.to_raw_string()).unwrap();
        assert_eq!(parsed, Some(v));
    }

    #[test]
    fn date_round_trips() {
        let v = Value::Date(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap());
        let parsed = ValueType::Date.parse_str(&v.to_raw_string()).unwrap();
        assert_eq!(parsed, Some(v));
    }

    #[test]
    fn empty_string_is_null() {
        assert_eq!(ValueType::Text.parse_str("").unwrap(), None);
        assert_eq!(ValueType::Integer.parse_str("").unwrap(), None);
    }

    #[test]
    fn malformed_input_is_a_type_cast_error() {
        let err = ValueType::Integer.parse_str("a dozen").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::TypeCast);
        let err = ValueType::Date.parse_str("31/08/2026").unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::TypeCast);
    }

    #[test]
    fn boolean_accepts_numeric_forms() {
        assert_eq!(
            ValueType::Boolean.parse_str("1").unwrap(),
            Some(Value::Boolean(true))
        );
        assert_eq!(
            ValueType::Boolean.parse_str("false").unwrap(),
            Some(Value::Boolean(false))
        );
        assert!(ValueType::Boolean.parse_str("yes").is_err());
    }
}
