// ABOUTME: Integration tests for recipe storage and graph assembly
// ABOUTME: Recipes with items resolve their ingredient foods in one batch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

mod common;

use std::collections::HashMap;

use larder::entity::EntityDraft;
use larder::models::{recipe, recipe_item, Recipe, RecipeItem};

#[tokio::test]
async fn recipe_view_attaches_items_and_their_foods() {
    let db = common::create_test_database().await.expect("db");
    let egg = db
        .save(&common::food_entity("Egg").expect("draft"))
        .await
        .expect("food");
    let milk = db
        .save(&common::food_entity("Milk").expect("draft"))
        .await
        .expect("food");

    let mut draft = EntityDraft::<Recipe>::create();
    draft
        .set(&recipe::NAME, Some("Scrambled eggs".to_owned()))
        .expect("name");
    let saved = db.save(&draft.build().expect("recipe")).await.expect("recipe");
    let recipe_id = saved.id().expect("id");

    for (food_id, grams) in [(egg.id().expect("id"), 120.0), (milk.id().expect("id"), 30.0)] {
        let mut item = EntityDraft::<RecipeItem>::create();
        item.set(&recipe_item::RECIPE_ID, Some(recipe_id)).expect("fk");
        item.set(&recipe_item::FOOD_ID, Some(food_id)).expect("fk");
        item.set(&recipe_item::AMOUNT_G, Some(grams)).expect("grams");
        db.save(&item.build().expect("item")).await.expect("item");
    }

    let view = db
        .recipe_view_by_name("Scrambled eggs")
        .await
        .expect("query")
        .expect("present");
    assert_eq!(view.recipe.id(), Some(recipe_id));
    assert_eq!(view.items.len(), 2);
    assert!(format!("{view:?}").contains("RecipeView"));
    let names: Vec<String> = view.items.iter().map(|i| i.food.name()).collect();
    assert!(names.contains(&"Egg".to_owned()));
    assert!(names.contains(&"Milk".to_owned()));

    assert!(db
        .recipe_view_by_name("Omelette")
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn recipe_items_import_by_recipe_and_food_name() {
    let db = common::create_test_database().await.expect("db");
    db.save(&common::food_entity("Egg").expect("draft")).await.expect("food");

    let mut draft = EntityDraft::<Recipe>::create();
    draft
        .set(&recipe::NAME, Some("Scrambled eggs".to_owned()))
        .expect("name");
    let saved = db.save(&draft.build().expect("recipe")).await.expect("recipe");

    // Both FK columns arrive as parent natural keys: two batched lookups
    let rows = [HashMap::from([
        ("recipe_id".to_owned(), "Scrambled eggs".to_owned()),
        ("food_id".to_owned(), "Egg".to_owned()),
        ("amount_g".to_owned(), "120".to_owned()),
    ])];
    let outcome = db.import_rows::<RecipeItem>(&rows);
    assert!(outcome.failed.is_empty());

    let persisted = db.save_import_batch(outcome.entities).await.expect("batch");
    assert!(persisted.failed.is_empty());
    assert_eq!(persisted.saved.len(), 1);
    assert_eq!(persisted.saved[0].recipe_id(), saved.id().expect("id"));
}
