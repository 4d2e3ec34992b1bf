// ABOUTME: End-to-end tests for the data source facade
// ABOUTME: Save dispatch, import batches, caching, day views, and deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

mod common;

use std::collections::HashMap;

use chrono::NaiveDate;
use larder::entity::{EntityDraft, ObjectSource};
use larder::errors::ErrorCode;
use larder::models::{food, food_portion, meal, Food, FoodPortion, Meal, Serving};

#[tokio::test]
async fn saving_a_user_draft_assigns_id_and_timestamps() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");

    assert_eq!(saved.source(), ObjectSource::Database);
    assert!(saved.has_id());
    assert!(saved.get(&food::CREATED_AT).is_some());
    assert_eq!(saved.get(&food::CREATED_AT), saved.get(&food::MODIFIED_AT));

    let loaded = db
        .get_by_id::<Food>(saved.id().expect("id"))
        .await
        .expect("load")
        .expect("present");
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn on_disk_store_is_created_and_survives_reconnect() {
    common::init_test_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite:{}", dir.path().join("larder.db").display());

    let id = {
        let db = larder::database::Database::new(&url, larder::models::registry().expect("registry"))
            .await
            .expect("create");
        let saved = db
            .save(&common::food_entity("Egg").expect("draft"))
            .await
            .expect("save");
        saved.id().expect("id")
    };

    let db = larder::database::Database::new(&url, larder::models::registry().expect("registry"))
        .await
        .expect("reopen");
    let loaded = db.get_by_id::<Food>(id).await.expect("load").expect("present");
    assert_eq!(loaded.get(&food::NAME).as_deref(), Some("Egg"));
}

#[tokio::test]
async fn saving_a_database_entity_issues_no_sql() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");

    let before = db.queries_issued();
    let again = db.save(&saved).await.expect("no-op save");
    assert_eq!(db.queries_issued(), before);
    assert_eq!(again, saved);
}

#[tokio::test]
#[should_panic(expected = "never persisted")]
async fn saving_a_computed_entity_is_a_defect() {
    let db = common::create_test_database().await.expect("db");
    let entity = common::food_entity("Egg").expect("draft");
    let computed = larder::entity::Entity::new(entity.data().copy(), ObjectSource::Computed)
        .expect("computed");
    let _ = db.save(&computed).await;
}

#[tokio::test]
async fn editing_updates_the_row_and_stamps_modified() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");

    let mut draft = EntityDraft::edit(&saved);
    draft.set(&food::ENERGY_KCAL, Some(143.0)).expect("editable");
    let edited = draft.build().expect("complete");
    assert_eq!(edited.source(), ObjectSource::DbEdit);

    let updated = db.save(&edited).await.expect("update");
    assert_eq!(updated.id(), saved.id());
    assert_eq!(updated.get(&food::ENERGY_KCAL), Some(143.0));
    assert_eq!(updated.get(&food::CREATED_AT), saved.get(&food::CREATED_AT));

    let loaded = db
        .get_by_id::<Food>(saved.id().expect("id"))
        .await
        .expect("load")
        .expect("present");
    assert_eq!(loaded.get(&food::ENERGY_KCAL), Some(143.0));
}

#[tokio::test]
async fn updating_a_deleted_row_is_not_found() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");
    let draft = EntityDraft::edit(&saved);
    assert!(db.delete_by_id::<Food>(saved.id().expect("id")).await.expect("delete"));

    let err = db.save(&draft.build().expect("entity")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn repeated_get_by_id_hits_the_cache() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");
    let id = saved.id().expect("id");

    let before = db.queries_issued();
    let first = db.get_by_id::<Food>(id).await.expect("load").expect("present");
    // The save already cached the entity, so even the first read is free
    assert_eq!(db.queries_issued(), before);
    let second = db.get_by_id::<Food>(id).await.expect("load").expect("present");
    assert_eq!(db.queries_issued(), before);
    assert_eq!(first, second);
}

#[tokio::test]
async fn import_persists_parents_then_children_by_natural_key() {
    let db = common::create_test_database().await.expect("db");

    let food_rows = [HashMap::from([
        ("name".to_owned(), "Egg".to_owned()),
        ("energy_kcal".to_owned(), "155".to_owned()),
        ("protein_g".to_owned(), "12.6".to_owned()),
        ("carbs_g".to_owned(), "1.1".to_owned()),
        ("fat_g".to_owned(), "10.6".to_owned()),
    ])];
    let foods = db.import_rows::<Food>(&food_rows);
    assert!(foods.failed.is_empty());
    let foods = db.save_import_batch(foods.entities).await.expect("parents");
    assert_eq!(foods.saved.len(), 1);
    let egg_id = foods.saved[0].id().expect("id");

    let serving_rows = [HashMap::from([
        ("food_id".to_owned(), "Egg".to_owned()),
        ("name".to_owned(), "large".to_owned()),
        ("amount_g".to_owned(), "63".to_owned()),
    ])];
    let servings = db.import_rows::<Serving>(&serving_rows);
    assert!(servings.failed.is_empty());
    let servings = db.save_import_batch(servings.entities).await.expect("children");
    assert_eq!(servings.saved.len(), 1);
    assert_eq!(servings.saved[0].food_id(), egg_id);
    // Absent is_default fell back to the column default
    assert!(!servings.saved[0].is_default());

    let stored = db.servings_for_food(egg_id).await.expect("servings");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name(), "large");
}

#[tokio::test]
async fn malformed_import_rows_fail_without_aborting_the_batch() {
    let db = common::create_test_database().await.expect("db");
    let rows = [
        HashMap::from([
            ("name".to_owned(), "Egg".to_owned()),
            ("energy_kcal".to_owned(), "155".to_owned()),
            ("protein_g".to_owned(), "12.6".to_owned()),
            ("carbs_g".to_owned(), "1.1".to_owned()),
            ("fat_g".to_owned(), "10.6".to_owned()),
        ]),
        HashMap::from([
            ("name".to_owned(), "Milk".to_owned()),
            ("energy_kcal".to_owned(), "plenty".to_owned()),
            ("protein_g".to_owned(), "3.4".to_owned()),
            ("carbs_g".to_owned(), "5.0".to_owned()),
            ("fat_g".to_owned(), "1.0".to_owned()),
        ]),
    ];
    let outcome = db.import_rows::<Food>(&rows);
    assert_eq!(outcome.entities.len(), 1);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].row, 1);
    assert_eq!(outcome.failed[0].error.code, ErrorCode::TypeCast);
}

#[tokio::test]
async fn saving_a_single_import_entity_resolves_its_keys_first() {
    let db = common::create_test_database().await.expect("db");
    let egg = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");

    let rows = [HashMap::from([
        ("food_id".to_owned(), "Egg".to_owned()),
        ("name".to_owned(), "large".to_owned()),
        ("amount_g".to_owned(), "63".to_owned()),
    ])];
    let outcome = db.import_rows::<Serving>(&rows);
    let saved = db.save(&outcome.entities[0]).await.expect("resolve and insert");
    assert_eq!(saved.food_id(), egg.id().expect("id"));
    assert!(saved.has_id());
}

#[tokio::test]
async fn saving_an_import_entity_with_no_matching_parent_fails() {
    let db = common::create_test_database().await.expect("db");

    let rows = [HashMap::from([
        ("food_id".to_owned(), "Butter".to_owned()),
        ("name".to_owned(), "pat".to_owned()),
        ("amount_g".to_owned(), "5".to_owned()),
    ])];
    let outcome = db.import_rows::<Serving>(&rows);
    let err = db.save(&outcome.entities[0]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::FkResolution);
    assert!(err.message.contains("food_id"));
}

async fn seed_breakfast(db: &larder::database::Database, day: NaiveDate) -> i64 {
    let egg = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("food");

    let mut draft = EntityDraft::<Meal>::create();
    draft.set(&meal::EATEN_ON, Some(day)).expect("date");
    let saved_meal = db.save(&draft.build().expect("meal")).await.expect("meal");
    let meal_id = saved_meal.id().expect("id");

    for grams in [120.0, 60.0] {
        let mut portion = EntityDraft::<FoodPortion>::create();
        portion.set(&food_portion::MEAL_ID, Some(meal_id)).expect("fk");
        portion
            .set(&food_portion::FOOD_ID, Some(egg.id().expect("id")))
            .expect("fk");
        portion.set(&food_portion::QUANTITY_G, Some(grams)).expect("grams");
        db.save(&portion.build().expect("portion")).await.expect("portion");
    }
    meal_id
}

#[tokio::test]
async fn day_view_assembles_the_graph_with_batched_queries() {
    let db = common::create_test_database().await.expect("db");
    let day = NaiveDate::from_ymd_opt(2026, 8, 30).expect("date");
    let meal_id = seed_breakfast(&db, day).await;

    let before = db.queries_issued();
    let views = db.meal_views_on(day).await.expect("views");
    // meals, portions, foods; no portion names a serving, so no fourth query
    assert_eq!(db.queries_issued() - before, 3);

    assert_eq!(views.len(), 1);
    let view = &views[0];
    assert_eq!(view.meal.id(), Some(meal_id));
    // Unset meal_type fell back to its default
    assert_eq!(view.meal.meal_type(), larder::models::MealType::Snack);
    assert_eq!(view.portions.len(), 2);
    for portion in &view.portions {
        assert_eq!(portion.food.name(), "Egg");
        assert!(portion.serving.is_none());
    }

    let empty_day = NaiveDate::from_ymd_opt(2026, 8, 31).expect("date");
    let views = db.meal_views_on(empty_day).await.expect("views");
    assert!(views.is_empty());
}

#[tokio::test]
async fn deleting_removes_the_row_and_the_cache_entry() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");
    let id = saved.id().expect("id");

    assert!(db.delete_by_id::<Food>(id).await.expect("delete"));
    assert!(db.get_by_id::<Food>(id).await.expect("load").is_none());
    // Second delete finds nothing
    assert!(!db.delete_by_id::<Food>(id).await.expect("delete"));
}

#[tokio::test]
async fn restore_preserves_ids_and_timestamps() {
    let db = common::create_test_database().await.expect("db");
    let saved = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("save");

    // Round-trip through a second store, the backup/restore path
    let replica = common::create_test_database().await.expect("db");
    let restored = larder::entity::Entity::new(saved.data().copy(), ObjectSource::Restore)
        .expect("restore entity");
    let stored = replica.save(&restored).await.expect("restore save");

    assert_eq!(stored.id(), saved.id());
    assert_eq!(stored.get(&food::CREATED_AT), saved.get(&food::CREATED_AT));
    assert_eq!(stored.get(&food::MODIFIED_AT), saved.get(&food::MODIFIED_AT));
    let loaded = replica
        .get_by_id::<Food>(saved.id().expect("id"))
        .await
        .expect("load")
        .expect("present");
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn duplicate_natural_keys_conflict_on_insert() {
    let db = common::create_test_database().await.expect("db");
    db.save(&common::food_entity("Egg").expect("draft")).await.expect("save");
    let err = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Conflict);
}
