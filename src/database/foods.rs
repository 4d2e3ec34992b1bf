// ABOUTME: Food-specific queries - lookup by name, keyword search, servings
// ABOUTME: Thin wrappers over the generic fetch operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use super::Database;
use crate::entity::Entity;
use crate::errors::AppResult;
use crate::models::{food, serving, Food, Serving};
use crate::schema::Value;

impl Database {
    /// Look up one food by its exact name
    pub async fn food_by_name(&self, name: &str) -> AppResult<Option<Entity<Food>>> {
        self.get_by_natural_key::<Food>(&Value::Text(name.to_owned()))
            .await
    }

    /// Prefix search over food name, brand and category
    pub async fn search_foods(&self, keyword: &str) -> AppResult<Vec<Entity<Food>>> {
        self.search_like::<Food>(
            &[food::NAME.spec(), food::BRAND.spec(), food::CATEGORY.spec()],
            keyword,
        )
        .await
    }

    /// All servings declared for one food
    pub async fn servings_for_food(&self, food_id: i64) -> AppResult<Vec<Entity<Serving>>> {
        self.fetch_where_eq::<Serving>(serving::FOOD_ID.spec(), &Value::Integer(food_id))
            .await
    }
}
