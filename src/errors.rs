// ABOUTME: Unified error handling for the larder persistence core
// ABOUTME: ErrorCode taxonomy, AppError type, and AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! # Unified Error Handling
//!
//! Centralized error types for the persistence core. Recoverable failures
//! (schema violations, type casts, foreign-key resolution, store errors)
//! surface as [`AppError`] results. Contract violations in calling code
//! (writing to a frozen row, reading an uncarried column, provenance/id
//! mismatches) are defects and halt with a panic instead of returning here.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "SCHEMA_VIOLATION")]
    SchemaViolation = 3000,
    #[serde(rename = "TYPE_CAST")]
    TypeCast = 3001,
    #[serde(rename = "FK_RESOLUTION")]
    FkResolution = 3002,
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3003,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    NotFound = 4000,
    #[serde(rename = "RESOURCE_CONFLICT")]
    Conflict = 4001,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SchemaViolation => "A required column is missing a value",
            Self::TypeCast => "A value could not be converted to the column's declared type",
            Self::FkResolution => "A natural-key reference has no matching parent row",
            Self::InvalidInput => "The provided input is invalid",
            Self::NotFound => "The requested record was not found",
            Self::Conflict => "A record with this identifier already exists",
            Self::ConfigError => "Configuration is missing or invalid",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "A database operation failed",
        }
    }

    /// Whether a batch operation may continue past this error for other rows
    #[must_use]
    pub const fn is_per_row(&self) -> bool {
        matches!(
            self,
            Self::SchemaViolation | Self::TypeCast | Self::FkResolution
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured details (offending columns, rejected values)
    pub details: Option<serde_json::Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Add structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors for common errors
impl AppError {
    /// A non-nullable column lacks a value at entity construction time
    pub fn schema_violation(table: &str, columns: &[&str]) -> Self {
        Self::new(
            ErrorCode::SchemaViolation,
            format!("table '{table}' is missing required columns: {}", columns.join(", ")),
        )
        .with_details(serde_json::json!({ "table": table, "columns": columns }))
    }

    /// A raw or string value cannot be converted to a column's declared type
    pub fn type_cast(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TypeCast, message)
    }

    /// A natural-key value has no matching parent row, or a parent table
    /// cannot serve as a completion target
    pub fn fk_resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FkResolution, message)
    }

    /// Invalid caller-supplied input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Record not found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Record already exists
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error with the driver failure attached
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                Self::not_found("no row matched the query").with_source(err)
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::conflict("a row with this unique value already exists").with_source(err)
            }
            _ => Self::database("database operation failed").with_source(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_stably() {
        let json = serde_json::to_string(&ErrorCode::SchemaViolation).unwrap();
        assert_eq!(json, "\"SCHEMA_VIOLATION\"");
    }

    #[test]
    fn schema_violation_names_offending_columns() {
        let err = AppError::schema_violation("foods", &["name", "energy_kcal"]);
        assert_eq!(err.code, ErrorCode::SchemaViolation);
        assert!(err.message.contains("name"));
        assert!(err.message.contains("energy_kcal"));
    }

    #[test]
    fn per_row_errors_cover_batch_taxonomy() {
        assert!(ErrorCode::TypeCast.is_per_row());
        assert!(ErrorCode::FkResolution.is_per_row());
        assert!(!ErrorCode::DatabaseError.is_per_row());
    }
}
