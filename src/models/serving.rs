// ABOUTME: Serving entity kind - a named portion size of one food
// ABOUTME: food_id/name form the secondary key; amount is grams per serving
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::schema::{Column, ColumnSpec, EntityKind, Table, Value, ValueType};

/// Entity kind marker for servings
#[derive(Debug)]
pub struct Serving;

fn default_is_default() -> Value {
    Value::Boolean(false)
}

/// Ordered column declarations for the `servings` table.
/// `food_id` + `name` together identify a serving when its id is unknown;
/// neither alone is unique, so the table has no natural key.
pub static COLUMNS: [ColumnSpec; 7] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("food_id", 3, ValueType::Integer)
        .references("foods", "id")
        .secondary_key(),
    ColumnSpec::new("name", 4, ValueType::Text).secondary_key(),
    ColumnSpec::new("amount_g", 5, ValueType::Real),
    ColumnSpec::new("is_default", 6, ValueType::Boolean).with_default(default_is_default),
];

pub static ID: Column<Serving, i64> = Column::new(&COLUMNS[0]);
pub static CREATED_AT: Column<Serving, DateTime<Utc>> = Column::new(&COLUMNS[1]);
pub static MODIFIED_AT: Column<Serving, DateTime<Utc>> = Column::new(&COLUMNS[2]);
pub static FOOD_ID: Column<Serving, i64> = Column::new(&COLUMNS[3]);
pub static NAME: Column<Serving, String> = Column::new(&COLUMNS[4]);
pub static AMOUNT_G: Column<Serving, f64> = Column::new(&COLUMNS[5]);
pub static IS_DEFAULT: Column<Serving, bool> = Column::new(&COLUMNS[6]);

impl EntityKind for Serving {
    const TABLE: &'static str = "servings";

    fn columns() -> &'static [ColumnSpec] {
        &COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<Serving>> =
            LazyLock::new(|| Table::build().expect("servings table metadata"));
        &TABLE
    }
}

impl Entity<Serving> {
    /// Owning food's surrogate id
    #[must_use]
    pub fn food_id(&self) -> i64 {
        self.get(&FOOD_ID).expect("required column")
    }

    /// Serving name, e.g. "slice" or "cup"
    #[must_use]
    pub fn name(&self) -> String {
        self.get(&NAME).expect("required column")
    }

    /// Gram weight of one serving
    #[must_use]
    pub fn amount_g(&self) -> f64 {
        self.get(&AMOUNT_G).expect("required column")
    }

    /// Whether this is the food's default serving
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.get(&IS_DEFAULT).expect("required column")
    }
}
