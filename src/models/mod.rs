// ABOUTME: The concrete nutrition schema - foods, servings, meals, portions, recipes
// ABOUTME: Entity kinds, typed column handles, graph views, and the schema registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

//! Nutrition entity kinds and their table declarations.
//!
//! Each module declares one table as a static column array plus typed
//! [`Column`](crate::schema::Column) handles, implements
//! [`EntityKind`](crate::schema::EntityKind), and adds accessor sugar on
//! `Entity<Kind>`. [`registry`] assembles the schema registry the
//! persistence layer is constructed with.

pub mod food;
pub mod food_portion;
pub mod meal;
pub mod recipe;
pub mod recipe_item;
pub mod serving;

pub use food::Food;
pub use food_portion::{FoodPortion, PortionView};
pub use meal::{Meal, MealType, MealView};
pub use recipe::{Recipe, RecipeView};
pub use recipe_item::{RecipeItem, RecipeItemView};
pub use serving::Serving;

use crate::errors::AppResult;
use crate::schema::SchemaRegistry;

/// Build the registry of every nutrition table, parents before children
pub fn registry() -> AppResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.register::<Food>()?;
    registry.register::<Serving>()?;
    registry.register::<Meal>()?;
    registry.register::<FoodPortion>()?;
    registry.register::<Recipe>()?;
    registry.register::<RecipeItem>()?;
    Ok(registry)
}
