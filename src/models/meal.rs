// ABOUTME: Meal entity kind plus MealType and the MealView entity graph
// ABOUTME: Meals are identified by day and meal type; portions attach via MealView
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::models::food_portion::PortionView;
use crate::schema::{Column, ColumnSpec, EntityKind, Table, Value, ValueType};

/// Entity kind marker for meals
#[derive(Debug)]
pub struct Meal;

/// Type of meal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    Snack,
}

impl MealType {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    /// Parse meal type from string, defaulting to snack
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            _ => Self::Snack,
        }
    }
}

fn default_meal_type() -> Value {
    Value::Text(MealType::Snack.as_str().to_owned())
}

/// Ordered column declarations for the `meals` table.
/// `eaten_on` + `meal_type` form the secondary key used by day queries.
pub static COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("eaten_on", 3, ValueType::Date).secondary_key(),
    ColumnSpec::new("meal_type", 4, ValueType::Text)
        .secondary_key()
        .with_default(default_meal_type),
    ColumnSpec::new("note", 5, ValueType::Text).nullable(),
];

pub static ID: Column<Meal, i64> = Column::new(&COLUMNS[0]);
pub static CREATED_AT: Column<Meal, DateTime<Utc>> = Column::new(&COLUMNS[1]);
pub static MODIFIED_AT: Column<Meal, DateTime<Utc>> = Column::new(&COLUMNS[2]);
pub static EATEN_ON: Column<Meal, NaiveDate> = Column::new(&COLUMNS[3]);
pub static MEAL_TYPE: Column<Meal, String> = Column::new(&COLUMNS[4]);
pub static NOTE: Column<Meal, String> = Column::new(&COLUMNS[5]);

impl EntityKind for Meal {
    const TABLE: &'static str = "meals";

    fn columns() -> &'static [ColumnSpec] {
        &COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<Meal>> =
            LazyLock::new(|| Table::build().expect("meals table metadata"));
        &TABLE
    }
}

impl Entity<Meal> {
    /// Day the meal was eaten
    #[must_use]
    pub fn eaten_on(&self) -> NaiveDate {
        self.get(&EATEN_ON).expect("required column")
    }

    /// Meal type
    #[must_use]
    pub fn meal_type(&self) -> MealType {
        MealType::from_str_lossy(&self.get(&MEAL_TYPE).expect("required column"))
    }

    /// Free-form note, if any
    #[must_use]
    pub fn note(&self) -> Option<String> {
        self.get(&NOTE)
    }
}

/// A meal with its food portions attached.
///
/// The graph is assembled in one pass by the data source facade and is
/// genuinely immutable; back-references are structural, not set-once cells.
#[derive(Debug, Clone)]
pub struct MealView {
    /// The meal itself
    pub meal: Entity<Meal>,
    /// Its portions with foods and servings attached
    pub portions: Vec<PortionView>,
}

impl MealView {
    /// Assemble a meal graph. Attaching a portion of a different meal is a
    /// defect and panics.
    #[must_use]
    pub fn new(meal: Entity<Meal>, portions: Vec<PortionView>) -> Self {
        let meal_id = meal.id().expect("persisted meal");
        for view in &portions {
            assert_eq!(
                view.portion.meal_id(),
                meal_id,
                "portion belongs to a different meal"
            );
        }
        Self { meal, portions }
    }
}
