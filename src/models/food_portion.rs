// ABOUTME: FoodPortion entity kind - one food eaten as part of a meal
// ABOUTME: PortionView attaches the resolved food and optional serving
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::sync::Arc;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::models::food::Food;
use crate::models::serving::Serving;
use crate::schema::{Column, ColumnSpec, EntityKind, Table, ValueType};

/// Entity kind marker for food portions
#[derive(Debug)]
pub struct FoodPortion;

/// Ordered column declarations for the `food_portions` table.
/// Imported rows reference their food by name rather than id, so `food_id`
/// routinely arrives as a pending natural key.
pub static COLUMNS: [ColumnSpec; 7] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("meal_id", 3, ValueType::Integer).references("meals", "id"),
    ColumnSpec::new("food_id", 4, ValueType::Integer).references("foods", "id"),
    ColumnSpec::new("serving_id", 5, ValueType::Integer)
        .references("servings", "id")
        .nullable(),
    ColumnSpec::new("quantity_g", 6, ValueType::Real),
];

pub static ID: Column<FoodPortion, i64> = Column::new(&COLUMNS[0]);
pub static CREATED_AT: Column<FoodPortion, DateTime<Utc>> = Column::new(&COLUMNS[1]);
pub static MODIFIED_AT: Column<FoodPortion, DateTime<Utc>> = Column::new(&COLUMNS[2]);
pub static MEAL_ID: Column<FoodPortion, i64> = Column::new(&COLUMNS[3]);
pub static FOOD_ID: Column<FoodPortion, i64> = Column::new(&COLUMNS[4]);
pub static SERVING_ID: Column<FoodPortion, i64> = Column::new(&COLUMNS[5]);
pub static QUANTITY_G: Column<FoodPortion, f64> = Column::new(&COLUMNS[6]);

impl EntityKind for FoodPortion {
    const TABLE: &'static str = "food_portions";

    fn columns() -> &'static [ColumnSpec] {
        &COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<FoodPortion>> =
            LazyLock::new(|| Table::build().expect("food_portions table metadata"));
        &TABLE
    }
}

impl Entity<FoodPortion> {
    /// Owning meal's surrogate id
    #[must_use]
    pub fn meal_id(&self) -> i64 {
        self.get(&MEAL_ID).expect("required column")
    }

    /// Eaten food's surrogate id
    #[must_use]
    pub fn food_id(&self) -> i64 {
        self.get(&FOOD_ID).expect("required column")
    }

    /// Serving the quantity was entered in, if any
    #[must_use]
    pub fn serving_id(&self) -> Option<i64> {
        self.get(&SERVING_ID)
    }

    /// Eaten quantity in grams
    #[must_use]
    pub fn quantity_g(&self) -> f64 {
        self.get(&QUANTITY_G).expect("required column")
    }
}

/// A portion with its food and optional serving attached.
///
/// Food presence is structural — a view cannot exist without its food — so
/// downstream aggregation never tests a nullable back-reference.
#[derive(Debug, Clone)]
pub struct PortionView {
    /// The portion row
    pub portion: Entity<FoodPortion>,
    /// The eaten food
    pub food: Arc<Entity<Food>>,
    /// The serving the quantity was entered in, if any
    pub serving: Option<Arc<Entity<Serving>>>,
}

impl PortionView {
    /// Attach related entities. Attaching a food or serving whose id does
    /// not match the portion's foreign keys is a defect and panics.
    #[must_use]
    pub fn new(
        portion: Entity<FoodPortion>,
        food: Arc<Entity<Food>>,
        serving: Option<Arc<Entity<Serving>>>,
    ) -> Self {
        assert_eq!(
            food.id(),
            Some(portion.food_id()),
            "attached food does not match the portion's food_id"
        );
        if let Some(serving) = &serving {
            assert_eq!(
                serving.id(),
                portion.serving_id(),
                "attached serving does not match the portion's serving_id"
            );
        }
        Self {
            portion,
            food,
            serving,
        }
    }
}
