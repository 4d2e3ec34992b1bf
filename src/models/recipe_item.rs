// ABOUTME: RecipeItem entity kind - one food amount within a recipe
// ABOUTME: RecipeItemView attaches the resolved food
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::sync::Arc;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::models::food::Food;
use crate::schema::{Column, ColumnSpec, EntityKind, Table, ValueType};

/// Entity kind marker for recipe items
#[derive(Debug)]
pub struct RecipeItem;

/// Ordered column declarations for the `recipe_items` table
pub static COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("recipe_id", 3, ValueType::Integer).references("recipes", "id"),
    ColumnSpec::new("food_id", 4, ValueType::Integer).references("foods", "id"),
    ColumnSpec::new("amount_g", 5, ValueType::Real),
];

pub static ID: Column<RecipeItem, i64> = Column::new(&COLUMNS[0]);
pub static CREATED_AT: Column<RecipeItem, DateTime<Utc>> = Column::new(&COLUMNS[1]);
pub static MODIFIED_AT: Column<RecipeItem, DateTime<Utc>> = Column::new(&COLUMNS[2]);
pub static RECIPE_ID: Column<RecipeItem, i64> = Column::new(&COLUMNS[3]);
pub static FOOD_ID: Column<RecipeItem, i64> = Column::new(&COLUMNS[4]);
pub static AMOUNT_G: Column<RecipeItem, f64> = Column::new(&COLUMNS[5]);

impl EntityKind for RecipeItem {
    const TABLE: &'static str = "recipe_items";

    fn columns() -> &'static [ColumnSpec] {
        &COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<RecipeItem>> =
            LazyLock::new(|| Table::build().expect("recipe_items table metadata"));
        &TABLE
    }
}

impl Entity<RecipeItem> {
    /// Owning recipe's surrogate id
    #[must_use]
    pub fn recipe_id(&self) -> i64 {
        self.get(&RECIPE_ID).expect("required column")
    }

    /// Ingredient food's surrogate id
    #[must_use]
    pub fn food_id(&self) -> i64 {
        self.get(&FOOD_ID).expect("required column")
    }

    /// Ingredient amount in grams
    #[must_use]
    pub fn amount_g(&self) -> f64 {
        self.get(&AMOUNT_G).expect("required column")
    }
}

/// A recipe item with its food attached
#[derive(Debug, Clone)]
pub struct RecipeItemView {
    /// The item row
    pub item: Entity<RecipeItem>,
    /// The ingredient food
    pub food: Arc<Entity<Food>>,
}

impl RecipeItemView {
    /// Attach the food. An id mismatch is a defect and panics.
    #[must_use]
    pub fn new(item: Entity<RecipeItem>, food: Arc<Entity<Food>>) -> Self {
        assert_eq!(
            food.id(),
            Some(item.food_id()),
            "attached food does not match the item's food_id"
        );
        Self { item, food }
    }
}
