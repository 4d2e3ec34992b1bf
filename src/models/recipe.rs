// ABOUTME: Recipe entity kind - a named collection of food amounts
// ABOUTME: RecipeView attaches items with their resolved foods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::sync::LazyLock;

use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::models::recipe_item::RecipeItemView;
use crate::schema::{Column, ColumnSpec, EntityKind, Table, ValueType};

/// Entity kind marker for recipes
#[derive(Debug)]
pub struct Recipe;

/// Ordered column declarations for the `recipes` table; `name` is the
/// natural key.
pub static COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("name", 3, ValueType::Text).unique().secondary_key(),
    ColumnSpec::new("note", 4, ValueType::Text).nullable(),
];

pub static ID: Column<Recipe, i64> = Column::new(&COLUMNS[0]);
pub static CREATED_AT: Column<Recipe, DateTime<Utc>> = Column::new(&COLUMNS[1]);
pub static MODIFIED_AT: Column<Recipe, DateTime<Utc>> = Column::new(&COLUMNS[2]);
pub static NAME: Column<Recipe, String> = Column::new(&COLUMNS[3]);
pub static NOTE: Column<Recipe, String> = Column::new(&COLUMNS[4]);

impl EntityKind for Recipe {
    const TABLE: &'static str = "recipes";

    fn columns() -> &'static [ColumnSpec] {
        &COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<Recipe>> =
            LazyLock::new(|| Table::build().expect("recipes table metadata"));
        &TABLE
    }
}

impl Entity<Recipe> {
    /// Recipe name, the natural key
    #[must_use]
    pub fn name(&self) -> String {
        self.get(&NAME).expect("required column")
    }

    /// Free-form note, if any
    #[must_use]
    pub fn note(&self) -> Option<String> {
        self.get(&NOTE)
    }
}

/// A recipe with its items and their foods attached
#[derive(Debug, Clone)]
pub struct RecipeView {
    /// The recipe itself
    pub recipe: Entity<Recipe>,
    /// Its items with foods attached
    pub items: Vec<RecipeItemView>,
}

impl RecipeView {
    /// Assemble a recipe graph. Attaching an item of a different recipe is
    /// a defect and panics.
    #[must_use]
    pub fn new(recipe: Entity<Recipe>, items: Vec<RecipeItemView>) -> Self {
        let recipe_id = recipe.id().expect("persisted recipe");
        for view in &items {
            assert_eq!(
                view.item.recipe_id(),
                recipe_id,
                "item belongs to a different recipe"
            );
        }
        Self { recipe, items }
    }
}
