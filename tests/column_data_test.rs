// ABOUTME: Integration tests for the typed row store
// ABOUTME: Covers carried sets, freezing, copies, equality, and defect panics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

mod common;

use larder::models::{food, Food};
use larder::schema::{ColumnData, Value};

fn filled_food_data() -> ColumnData<Food> {
    let mut data = ColumnData::<Food>::carrying_all();
    data.put(&food::NAME, Some("Egg".to_owned()));
    data.put(&food::ENERGY_KCAL, Some(155.0));
    data.put(&food::PROTEIN_G, Some(12.6));
    data.put(&food::CARBS_G, Some(1.1));
    data.put(&food::FAT_G, Some(10.6));
    data
}

#[test]
fn typed_get_returns_what_was_put() {
    let data = filled_food_data();
    assert_eq!(data.get(&food::NAME).as_deref(), Some("Egg"));
    assert_eq!(data.get(&food::ENERGY_KCAL), Some(155.0));
    // Nullable column never written reads as null, not as a defect
    assert_eq!(data.get(&food::BRAND), None);
}

#[test]
fn carried_subset_tracks_what_it_carries() {
    let data = ColumnData::<Food>::carrying(&[food::ID.spec(), food::NAME.spec()]);
    assert!(data.carries(food::NAME.spec()));
    assert!(!data.carries(food::BRAND.spec()));
}

#[test]
#[should_panic(expected = "not carried")]
fn reading_an_uncarried_column_panics() {
    let data = ColumnData::<Food>::carrying(&[food::ID.spec()]);
    let _ = data.get(&food::NAME);
}

#[test]
#[should_panic(expected = "frozen")]
fn writing_a_frozen_store_panics() {
    let mut data = filled_food_data();
    data.freeze();
    data.put(&food::NAME, Some("Duck egg".to_owned()));
}

#[test]
fn type_mismatch_on_raw_put_is_recoverable() {
    let mut data = ColumnData::<Food>::carrying_all();
    let err = data
        .put_raw(food::ENERGY_KCAL.spec(), Some(Value::Text("lots".to_owned())))
        .unwrap_err();
    assert_eq!(err.code, larder::errors::ErrorCode::TypeCast);
}

#[test]
fn copies_are_independent_and_thawed() {
    let mut original = filled_food_data();
    original.freeze();
    let mut copy = original.copy();
    assert!(!copy.is_frozen());
    copy.put(&food::NAME, Some("Duck egg".to_owned()));
    assert_eq!(original.get(&food::NAME).as_deref(), Some("Egg"));
    assert_eq!(copy.get(&food::NAME).as_deref(), Some("Duck egg"));
}

#[test]
fn subset_copy_carries_only_the_requested_columns() {
    let original = filled_food_data();
    let subset = original.copy_columns(&[food::ID.spec(), food::NAME.spec()]);
    assert!(subset.carries(food::NAME.spec()));
    assert!(!subset.carries(food::ENERGY_KCAL.spec()));
    assert_eq!(subset.get(&food::NAME).as_deref(), Some("Egg"));
}

#[test]
fn string_map_renders_carried_columns_with_null_as_empty() {
    let map = filled_food_data().to_string_map();
    assert_eq!(map.get("name").map(String::as_str), Some("Egg"));
    assert_eq!(map.get("energy_kcal").map(String::as_str), Some("155"));
    // Carried but null
    assert_eq!(map.get("brand").map(String::as_str), Some(""));
}

#[test]
fn equality_ignores_frozen_state() {
    let thawed = filled_food_data();
    let mut frozen = filled_food_data();
    frozen.freeze();
    assert_eq!(thawed, frozen);
}

#[test]
fn missing_required_reports_unfilled_non_nullable_columns() {
    let mut data = ColumnData::<Food>::carrying_all();
    data.put(&food::NAME, Some("Egg".to_owned()));
    let missing = data.missing_required(&[]);
    assert_eq!(missing, ["energy_kcal", "protein_g", "carbs_g", "fat_g"]);
}
