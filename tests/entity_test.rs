// ABOUTME: Integration tests for the entity lifecycle wrapper and drafts
// ABOUTME: Covers construction invariants, provenance dispatch, and edit flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

mod common;

use std::collections::HashMap;

use larder::entity::{Entity, EntityDraft, ObjectSource};
use larder::errors::ErrorCode;
use larder::models::{food, serving, Food, Serving};
use larder::schema::{ColumnData, Value};

#[test]
fn draft_build_requires_every_non_nullable_column() {
    let mut draft = EntityDraft::<Food>::create();
    draft
        .set(&food::NAME, Some("Egg".to_owned()))
        .expect("settable");
    assert!(!draft.missing().is_empty());
    let err = draft.build().unwrap_err();
    assert_eq!(err.code, ErrorCode::SchemaViolation);
}

#[test]
fn built_drafts_are_user_new_without_an_id() {
    let entity = common::food_entity("Egg").expect("entity");
    assert_eq!(entity.source(), ObjectSource::UserNew);
    assert!(!entity.has_id());
    assert_eq!(entity.get(&food::NAME).as_deref(), Some("Egg"));
}

#[test]
#[should_panic(expected = "id presence disagree")]
fn user_new_with_an_id_is_a_defect() {
    let entity = common::food_entity("Egg").expect("entity");
    let mut data = entity.data().copy();
    data.put(&food::ID, Some(7));
    let _ = Entity::new(data, ObjectSource::UserNew);
}

#[test]
fn drafts_reject_writes_to_read_only_columns() {
    let mut draft = EntityDraft::<Food>::create();
    let err = draft.set(&food::ID, Some(1)).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn drafts_reject_clearing_a_required_column() {
    let mut draft = EntityDraft::<Food>::create();
    let err = draft.set(&food::ENERGY_KCAL, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn set_str_parses_per_declared_type() {
    let mut draft = EntityDraft::<Food>::create();
    draft.set_str("name", "Egg").expect("text");
    draft.set_str("energy_kcal", "155").expect("real");
    let err = draft.set_str("energy_kcal", "lots").unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeCast);
    // Empty text clears, which a required column refuses
    let err = draft.set_str("energy_kcal", "").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn pending_natural_keys_exempt_their_columns_from_validation() {
    let mut data = ColumnData::<Serving>::carrying_all();
    data.put(&serving::NAME, Some("large".to_owned()));
    data.put(&serving::AMOUNT_G, Some(63.0));
    data.put(&serving::IS_DEFAULT, Some(false));

    // food_id is non-nullable but known only by the parent's name so far
    let mut pending: HashMap<&'static str, Value> = HashMap::new();
    pending.insert("food_id", Value::Text("Egg".to_owned()));

    let entity =
        Entity::with_pending(data, ObjectSource::Import, pending).expect("pending exempts fk");
    assert!(entity.has_pending_fk());
    assert_eq!(
        entity.pending_natural_keys().get("food_id"),
        Some(&Value::Text("Egg".to_owned()))
    );
}

#[test]
fn entities_compare_by_row_data_not_provenance() {
    let a = common::food_entity("Egg").expect("entity");
    let b = common::food_entity("Egg").expect("entity");
    assert_eq!(a, b);
    let c = common::food_entity("Duck egg").expect("entity");
    assert_ne!(a, c);
}

#[test]
fn entities_and_graph_views_are_debug_formattable() {
    let entity = common::food_entity("Egg").expect("entity");
    let rendered = format!("{entity:?}");
    assert!(rendered.contains("Entity"));
    assert!(rendered.contains("UserNew"));
}

#[test]
fn object_source_predicates_partition_the_variants() {
    use ObjectSource::{Computed, Database, DbEdit, Import, Inbuilt, Restore, UserNew};
    for source in [Database, Restore, DbEdit, Inbuilt] {
        assert!(source.requires_id(), "{source} requires an id");
    }
    for source in [UserNew, Import, Computed] {
        assert!(!source.requires_id(), "{source} starts without an id");
    }
    for source in [Database, DbEdit, Inbuilt] {
        assert!(source.is_persisted());
    }
    assert!(!Database.may_differ_from_store());
    assert!(!Inbuilt.may_differ_from_store());
    assert!(DbEdit.may_differ_from_store());
}
