// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database setup and entity construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `larder` integration tests

use std::sync::Once;

use anyhow::Result;
use larder::database::Database;
use larder::entity::{Entity, EntityDraft};
use larder::models::{self, food, Food};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database with the full nutrition schema
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", models::registry()?).await?;
    Ok(database)
}

/// A user-entered food draft with the given name and plain nutrient values
pub fn food_entity(name: &str) -> Result<Entity<Food>> {
    let mut draft = EntityDraft::<Food>::create();
    draft.set(&food::NAME, Some(name.to_owned()))?;
    draft.set(&food::ENERGY_KCAL, Some(155.0))?;
    draft.set(&food::PROTEIN_G, Some(12.6))?;
    draft.set(&food::CARBS_G, Some(1.1))?;
    draft.set(&food::FAT_G, Some(10.6))?;
    Ok(draft.build()?)
}
