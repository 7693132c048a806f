mod common;

use common::obj;
use entigraph_model::{EntityId, EntitySchema, EntityStore, Error, MergeStrategy};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn add_inserts_new_entity() {
    let schema = EntitySchema::new("users").unwrap();
    let mut store = EntityStore::new();
    let input = obj(json!({"id": 1, "name": "ann"}));

    store.add(&schema, input.clone(), &input, None, None).unwrap();

    assert_eq!(store.entities().len(), 1);
    assert_eq!(store.entities().get("users", &EntityId::from(1)), Some(&input));
}

#[test]
fn add_merges_partial_views_on_collision() {
    let schema = EntitySchema::new("users").unwrap();
    let mut store = EntityStore::new();
    let full = obj(json!({"id": 1, "name": "ann", "email": "ann@example.com"}));
    let partial = obj(json!({"id": 1, "name": "Ann"}));

    store.add(&schema, full.clone(), &full, None, None).unwrap();
    store.add(&schema, partial.clone(), &partial, None, None).unwrap();

    assert_eq!(store.entities().len(), 1);
    assert_eq!(
        store.entities().get("users", &EntityId::from(1)),
        Some(&obj(json!({"id": 1, "name": "Ann", "email": "ann@example.com"})))
    );
}

#[test]
fn add_uses_schema_merge_strategy() {
    let schema = EntitySchema::builder("users")
        .merge_strategy(MergeStrategy::PreferExisting)
        .build()
        .unwrap();
    let mut store = EntityStore::new();
    let first = obj(json!({"id": 1, "name": "ann"}));
    let second = obj(json!({"id": 1, "name": "Ann", "age": 30}));

    store.add(&schema, first.clone(), &first, None, None).unwrap();
    store.add(&schema, second.clone(), &second, None, None).unwrap();

    assert_eq!(
        store.entities().get("users", &EntityId::from(1)),
        Some(&obj(json!({"id": 1, "name": "ann", "age": 30})))
    );
}

#[test]
fn add_keeps_types_in_separate_buckets() {
    let users = EntitySchema::new("users").unwrap();
    let groups = EntitySchema::new("groups").unwrap();
    let mut store = EntityStore::new();
    let user = obj(json!({"id": 1, "name": "ann"}));
    let group = obj(json!({"id": 1, "title": "admins"}));

    store.add(&users, user.clone(), &user, None, None).unwrap();
    store.add(&groups, group.clone(), &group, None, None).unwrap();

    let entities = store.into_entities();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities.get("users", &EntityId::from(1)), Some(&user));
    assert_eq!(entities.get("groups", &EntityId::from(1)), Some(&group));
}

#[test]
fn add_derives_id_from_raw_input() {
    let schema = EntitySchema::new("users").unwrap();
    let mut store = EntityStore::new();
    let input = obj(json!({"id": "u1", "name": "ann"}));
    let processed = obj(json!({"name": "ann"}));

    store.add(&schema, processed.clone(), &input, None, None).unwrap();

    assert_eq!(store.entities().get("users", &EntityId::from("u1")), Some(&processed));
}

#[test]
fn add_propagates_merge_hook_error() {
    let schema = EntitySchema::builder("users")
        .merge_with(|_, _| Err("conflict".into()))
        .build()
        .unwrap();
    let mut store = EntityStore::new();
    let input = obj(json!({"id": 1}));

    store.add(&schema, input.clone(), &input, None, None).unwrap();
    let err = store.add(&schema, input.clone(), &input, None, None).unwrap_err();

    assert!(matches!(err, Error::Hook(_)));
    assert_eq!(err.to_string(), "conflict");
}
