// ABOUTME: Environment-based runtime configuration for the tracker
// ABOUTME: Database location, log level, and cache sizing from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Runtime configuration read from the environment.

use std::env;

use crate::database::DEFAULT_CACHE_CAPACITY;
use crate::errors::{AppError, AppResult};

/// Default on-disk store when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:larder.db";

/// Log level for the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Error level logging
    Error,
    /// Warning level logging
    Warn,
    /// Info level logging
    Info,
    /// Debug level logging
    Debug,
    /// Trace level logging
    Trace,
}

impl LogLevel {
    /// Convert to the tracing crate's level type
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from a string, defaulting to `Info` on unknown input
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Runtime configuration for the tracker
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// SQLite connection string
    pub database_url: String,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Entity cache bound
    pub cache_capacity: usize,
}

impl TrackerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error when a variable is present but malformed
    pub fn from_env() -> AppResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());
        let log_level = LogLevel::from_str_lossy(
            &env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()),
        );
        let cache_capacity = match env::var("CACHE_CAPACITY") {
            Err(_) => DEFAULT_CACHE_CAPACITY,
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                AppError::config(format!("CACHE_CAPACITY '{raw}' is not a number")).with_source(e)
            })?,
        };
        Ok(Self {
            database_url,
            log_level,
            cache_capacity,
        })
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            log_level: LogLevel::Info,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
