// ABOUTME: Meal queries and day-view assembly - meals with portions, foods, servings
// ABOUTME: Graph assembly batches one query per related table, never one per row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::Database;
use crate::entity::Entity;
use crate::errors::{AppError, AppResult};
use crate::models::{food, food_portion, meal, serving};
use crate::models::{Food, FoodPortion, Meal, MealView, PortionView, Serving};
use crate::schema::{EntityKind, Value};

fn by_id<M: EntityKind>(entities: Vec<Entity<M>>) -> HashMap<i64, Arc<Entity<M>>> {
    entities
        .into_iter()
        .filter_map(|e| e.id().map(|id| (id, Arc::new(e))))
        .collect()
}

impl Database {
    /// All meals eaten on one day
    pub async fn meals_on(&self, date: NaiveDate) -> AppResult<Vec<Entity<Meal>>> {
        self.fetch_where_eq::<Meal>(meal::EATEN_ON.spec(), &Value::Date(date))
            .await
    }

    /// Assemble the full day view: every meal of the day with its portions,
    /// their foods and their servings attached.
    ///
    /// Issues one query per table involved (meals, portions, foods,
    /// servings) regardless of how many rows the day holds.
    pub async fn meal_views_on(&self, date: NaiveDate) -> AppResult<Vec<MealView>> {
        let meals = self.meals_on(date).await?;
        let meal_ids: Vec<Value> = meals
            .iter()
            .filter_map(Entity::id)
            .map(Value::Integer)
            .collect();
        let portions = self
            .fetch_where_in::<FoodPortion>(food_portion::MEAL_ID.spec(), &meal_ids)
            .await?;

        let food_ids: BTreeSet<i64> = portions.iter().map(Entity::<FoodPortion>::food_id).collect();
        let serving_ids: BTreeSet<i64> = portions
            .iter()
            .filter_map(Entity::<FoodPortion>::serving_id)
            .collect();

        let foods = by_id(
            self.fetch_where_in::<Food>(
                food::ID.spec(),
                &food_ids.iter().copied().map(Value::Integer).collect::<Vec<_>>(),
            )
            .await?,
        );
        let servings = by_id(
            self.fetch_where_in::<Serving>(
                serving::ID.spec(),
                &serving_ids
                    .iter()
                    .copied()
                    .map(Value::Integer)
                    .collect::<Vec<_>>(),
            )
            .await?,
        );

        let mut grouped: HashMap<i64, Vec<PortionView>> = HashMap::new();
        for portion in portions {
            let food = foods.get(&portion.food_id()).cloned().ok_or_else(|| {
                AppError::internal(format!(
                    "portion {:?} references missing food {}",
                    portion.id(),
                    portion.food_id()
                ))
            })?;
            let attached_serving = match portion.serving_id() {
                None => None,
                Some(id) => Some(servings.get(&id).cloned().ok_or_else(|| {
                    AppError::internal(format!(
                        "portion {:?} references missing serving {id}",
                        portion.id()
                    ))
                })?),
            };
            let meal_id = portion.meal_id();
            grouped
                .entry(meal_id)
                .or_default()
                .push(PortionView::new(portion, food, attached_serving));
        }

        let views: Vec<MealView> = meals
            .into_iter()
            .map(|m| {
                let portions = m
                    .id()
                    .and_then(|id| grouped.remove(&id))
                    .unwrap_or_default();
                MealView::new(m, portions)
            })
            .collect();
        debug!(date = %date, meals = views.len(), "day view assembled");
        Ok(views)
    }
}
