// ABOUTME: Integration tests for generated SQL shapes against the real schema
// ABOUTME: Keyword search, batched IN lookups, and generated DDL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

mod common;

use larder::models::{self, food, Food};
use larder::schema::EntityKind;
use larder::sql::{ddl, template};

fn food_columns() -> Vec<&'static larder::schema::ColumnSpec> {
    Food::table().columns().iter().collect()
}

#[test]
fn keyword_search_ors_one_like_per_search_column() {
    let sql = template::select_where_like_any(
        "foods",
        &food_columns(),
        &[food::NAME.spec(), food::BRAND.spec(), food::CATEGORY.spec()],
    );
    assert!(sql.ends_with("WHERE name LIKE $1 OR brand LIKE $2 OR category LIKE $3"));
    assert_eq!(sql.matches("LIKE").count(), 3);
}

#[test]
fn zero_search_columns_selects_everything() {
    let sql = template::select_where_like_any("foods", &food_columns(), &[]);
    assert!(!sql.contains("WHERE"));
    assert!(sql.starts_with("SELECT id, created_at, modified_at, name"));
}

#[test]
fn zero_in_values_selects_everything() {
    let sql = template::select_where_in("foods", &food_columns(), food::ID.spec(), 0);
    assert!(!sql.contains("WHERE"));
}

#[test]
fn batched_in_lookup_numbers_its_placeholders() {
    let sql = template::select_where_in("foods", &food_columns(), food::ID.spec(), 3);
    assert!(sql.ends_with("WHERE id IN ($1, $2, $3)"));
}

#[test]
fn secondary_keys_become_indexes() {
    let registry = models::registry().expect("registry");
    let meals = registry.table("meals").expect("meals");
    let indexes = ddl::create_indexes(meals);
    assert!(indexes
        .iter()
        .any(|sql| sql.contains("idx_meals_secondary") && sql.contains("eaten_on, meal_type")));
}
