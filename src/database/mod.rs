// ABOUTME: Data source facade - pool, migration, and entity-level operations
// ABOUTME: Orchestrates templates, binding, FK completion, and the entity cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! # Database Management
//!
//! The data source facade over the relational store. Construction connects
//! a SQLite pool and issues the DDL generated from the schema registry;
//! entity-level operations live in per-concern modules (`fetch`, `save`,
//! `fk`, plus the food/meal/recipe convenience queries) as `impl Database`
//! blocks.

pub mod cache;
mod fetch;
mod fk;
mod foods;
mod import;
mod meals;
mod recipes;
mod save;

pub use fk::{FkFailure, FkOutcome};
pub use import::{ImportFailure, ImportOutcome};
pub use save::ImportSaveOutcome;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::Transaction;
use tracing::{debug, info};

use crate::database::cache::EntityCache;
use crate::errors::AppResult;
use crate::schema::SchemaRegistry;
use crate::sql::ddl;

/// Default bound on the read-through entity cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Data source facade for the nutrition store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    registry: Arc<SchemaRegistry>,
    cache: EntityCache,
    queries: Arc<AtomicU64>,
}

impl Database {
    /// Connect and migrate with the default cache bound
    pub async fn new(database_url: &str, registry: SchemaRegistry) -> AppResult<Self> {
        Self::with_cache_capacity(database_url, registry, DEFAULT_CACHE_CAPACITY).await
    }

    /// Connect, create the schema from registry metadata, and size the cache
    pub async fn with_cache_capacity(
        database_url: &str,
        registry: SchemaRegistry,
        cache_capacity: usize,
    ) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self {
            pool,
            registry: Arc::new(registry),
            cache: EntityCache::new(cache_capacity),
            queries: Arc::new(AtomicU64::new(0)),
        };

        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The schema registry this database was constructed with
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Issue the DDL generated from table metadata, parents first
    pub async fn migrate(&self) -> AppResult<()> {
        for table in self.registry.tables() {
            debug!(table = table.name, "creating table");
            self.note_query();
            sqlx::query(&ddl::create_table(table))
                .execute(&self.pool)
                .await?;
            for index in ddl::create_indexes(table) {
                self.note_query();
                sqlx::query(&index).execute(&self.pool).await?;
            }
        }
        info!(tables = self.registry.tables().len(), "schema ready");
        Ok(())
    }

    /// Begin an explicit transaction for grouped writes; the caller commits
    /// or lets it roll back on drop
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Number of statements issued so far; diagnostics for logs and tests
    #[must_use]
    pub fn queries_issued(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub(crate) fn note_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cache(&self) -> &EntityCache {
        &self.cache
    }
}
