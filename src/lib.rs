// ABOUTME: Main library entry point for the Larder nutrition tracker
// ABOUTME: Typed schema metadata, entity lifecycle, and SQLite persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

#![deny(unsafe_code)]

//! # Larder
//!
//! A typed schema and persistence core for a nutrition tracker. Tables are
//! declared once as column metadata; row storage, SQL generation, binding,
//! foreign-key resolution, and text import are all driven from that
//! metadata instead of per-entity hand-written plumbing.
//!
//! ## Architecture
//!
//! - **Schema**: column descriptors, table metadata, the typed row store
//! - **Entity**: lifecycle wrapper tying frozen row data to its provenance
//! - **Models**: the concrete nutrition tables and their graph views
//! - **SQL**: statement templates, driver binding, and generated DDL
//! - **Database**: the data source facade orchestrating all of the above
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use larder::database::Database;
//! use larder::errors::AppResult;
//! use larder::models;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let db = Database::new("sqlite:larder.db", models::registry()?).await?;
//!     let foods = db.search_foods("oat").await?;
//!     println!("{} foods match", foods.len());
//!     Ok(())
//! }
//! ```

/// Runtime configuration from the environment
pub mod config;

/// Data source facade over the SQLite store
pub mod database;

/// Entity lifecycle wrapper and provenance tracking
pub mod entity;

/// Error types and error code definitions
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// Concrete nutrition tables and graph views
pub mod models;

/// Column descriptors, table metadata, and the typed row store
pub mod schema;

/// SQL statement templates, driver binding, and DDL generation
pub mod sql;
