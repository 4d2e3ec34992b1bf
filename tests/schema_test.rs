// ABOUTME: Integration tests for table metadata and the schema registry
// ABOUTME: Covers fixed columns, natural keys, and cross-table FK validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

mod common;

use std::sync::LazyLock;

use larder::errors::ErrorCode;
use larder::models::{self, Food, FoodPortion, RecipeItem, Serving};
use larder::schema::{ColumnSpec, EntityKind, SchemaRegistry, Table, ValueType};

#[test]
fn registry_builds_the_full_schema_in_order() {
    let registry = models::registry().expect("registry");
    let names: Vec<&str> = registry.tables().iter().map(|t| t.name).collect();
    assert_eq!(
        names,
        ["foods", "servings", "meals", "food_portions", "recipes", "recipe_items"]
    );
}

#[test]
fn fixed_columns_hold_their_positions() {
    let table = Food::table();
    assert_eq!(table.id_column().name, "id");
    assert_eq!(table.created_column().name, "created_at");
    assert_eq!(table.modified_column().name, "modified_at");
    assert!(!table.id_column().editable);
    assert_eq!(table.created_column().value_type, ValueType::Timestamp);
}

#[test]
fn single_unique_column_is_the_natural_key() {
    assert_eq!(Food::table().natural_key().map(|c| c.name), Some("name"));
    // Servings are only unique per food, so no single-column natural key
    assert!(Serving::table().natural_key().is_none());
}

#[test]
fn foreign_keys_carry_their_parent_references() {
    let fks: Vec<&str> = FoodPortion::table().foreign_keys().map(|c| c.name).collect();
    assert_eq!(fks, ["meal_id", "food_id", "serving_id"]);
    let meal_fk = FoodPortion::table().column("meal_id").expect("column");
    let target = meal_fk.references.expect("reference");
    assert_eq!(target.table, "meals");
    assert_eq!(target.column, "id");
}

#[test]
fn registering_a_child_before_its_parents_fails() {
    let mut registry = SchemaRegistry::new();
    let err = registry.register::<RecipeItem>().unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
}

#[test]
fn registering_a_table_twice_fails() {
    let mut registry = SchemaRegistry::new();
    registry.register::<Food>().expect("first registration");
    let err = registry.register::<Food>().unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
}

/// Table passing per-table validation while its FK disagrees with the
/// parent's value type, to show where the cross-table check runs
#[derive(Debug)]
struct TextFkChild;

static TEXT_FK_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::new("id", 0, ValueType::Integer).read_only(),
    ColumnSpec::new("created_at", 1, ValueType::Timestamp).read_only(),
    ColumnSpec::new("modified_at", 2, ValueType::Timestamp).read_only(),
    ColumnSpec::new("food_id", 3, ValueType::Text).references("foods", "id"),
];

impl EntityKind for TextFkChild {
    const TABLE: &'static str = "text_fk_children";

    fn columns() -> &'static [ColumnSpec] {
        &TEXT_FK_COLUMNS
    }

    fn table() -> &'static Table<Self> {
        static TABLE: LazyLock<Table<TextFkChild>> =
            LazyLock::new(|| Table::build().expect("text_fk_children table metadata"));
        &TABLE
    }
}

#[test]
fn fk_value_type_mismatch_is_caught_at_registration() {
    // Build only sees one table at a time, so the mismatch passes here
    assert!(Table::<TextFkChild>::build().is_ok());

    let mut registry = SchemaRegistry::new();
    registry.register::<Food>().expect("parent");
    let err = registry.register::<TextFkChild>().unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
    assert!(err.message.contains("value type"));
}
