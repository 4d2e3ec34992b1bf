// ABOUTME: Recipe queries - lookup by name and full recipe-graph assembly
// ABOUTME: Items and their foods load in one batched query each
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::Database;
use crate::entity::Entity;
use crate::errors::{AppError, AppResult};
use crate::models::{food, recipe_item};
use crate::models::{Food, Recipe, RecipeItem, RecipeItemView, RecipeView};
use crate::schema::Value;

impl Database {
    /// Look up one recipe by its exact name
    pub async fn recipe_by_name(&self, name: &str) -> AppResult<Option<Entity<Recipe>>> {
        self.get_by_natural_key::<Recipe>(&Value::Text(name.to_owned()))
            .await
    }

    /// Assemble a recipe with its items and their foods attached, or `None`
    /// when no recipe has that name
    pub async fn recipe_view_by_name(&self, name: &str) -> AppResult<Option<RecipeView>> {
        let Some(recipe) = self.recipe_by_name(name).await? else {
            return Ok(None);
        };
        let recipe_id = recipe.id().expect("loaded recipes carry an id");
        let items = self
            .fetch_where_eq::<RecipeItem>(recipe_item::RECIPE_ID.spec(), &Value::Integer(recipe_id))
            .await?;

        let food_ids: BTreeSet<i64> = items.iter().map(Entity::<RecipeItem>::food_id).collect();
        let foods: HashMap<i64, Arc<Entity<Food>>> = self
            .fetch_where_in::<Food>(
                food::ID.spec(),
                &food_ids.iter().copied().map(Value::Integer).collect::<Vec<_>>(),
            )
            .await?
            .into_iter()
            .filter_map(|f| f.id().map(|id| (id, Arc::new(f))))
            .collect();

        let mut views = Vec::with_capacity(items.len());
        for item in items {
            let food = foods.get(&item.food_id()).cloned().ok_or_else(|| {
                AppError::internal(format!(
                    "recipe item {:?} references missing food {}",
                    item.id(),
                    item.food_id()
                ))
            })?;
            views.push(RecipeItemView::new(item, food));
        }
        Ok(Some(RecipeView::new(recipe, views)))
    }
}
