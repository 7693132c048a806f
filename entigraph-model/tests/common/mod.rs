//! Shared test helpers: a minimal traversal engine and a recording
//! collaborator.

#![allow(dead_code)]

use entigraph_model::{
    Denormalizer, Entities, EntityId, EntitySchema, EntityStore, FieldSchema, Normalizer, Object,
    Result, SchemaRegistry,
};
use serde_json::{Value, json};

/// Installs a test-writer subscriber once; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Walks nested values by resolving field schemas through a registry and
/// commits entities into an [`EntityStore`].
pub struct Walker<'a> {
    registry: &'a SchemaRegistry,
    store: EntityStore,
}

impl<'a> Walker<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            store: EntityStore::new(),
        }
    }

    pub fn into_entities(self) -> Entities {
        self.store.into_entities()
    }

    fn normalize_item(
        &mut self,
        schema: &EntitySchema,
        item: &Value,
        parent: &Object,
        key: &str,
    ) -> Result<Value> {
        match item {
            Value::Object(obj) => Ok(schema.normalize(obj, Some(parent), Some(key), self)?.to_value()),
            other => Ok(other.clone()),
        }
    }
}

impl Normalizer for Walker<'_> {
    fn visit(
        &mut self,
        value: &Value,
        parent: &Object,
        key: &str,
        field: &FieldSchema,
    ) -> Result<Value> {
        let registry = self.registry;
        let Some(schema) = registry.resolve(field)? else {
            return Ok(value.clone());
        };
        match (field, value) {
            (FieldSchema::Collection(_), Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.normalize_item(schema, item, parent, key)?);
                }
                Ok(Value::Array(out))
            }
            _ => self.normalize_item(schema, value, parent, key),
        }
    }

    fn add_entity(
        &mut self,
        schema: &EntitySchema,
        processed: Object,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
    ) -> Result<()> {
        self.store.add(schema, processed, input, parent, key)
    }
}

impl Denormalizer for Walker<'_> {
    fn unvisit(&mut self, value: &Value, field: &FieldSchema, entities: &Entities) -> Result<Value> {
        let registry = self.registry;
        let Some(schema) = registry.resolve(field)? else {
            return Ok(value.clone());
        };
        match (field, value) {
            (_, Value::Null) => Ok(Value::Null),
            (FieldSchema::Collection(_), Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Value::Object(schema.denormalize(item, self, entities)?));
                }
                Ok(Value::Array(out))
            }
            _ => Ok(Value::Object(schema.denormalize(value, self, entities)?)),
        }
    }
}

/// Normalizes a root entity of type `key`.
pub fn normalize(registry: &SchemaRegistry, key: &str, input: &Object) -> Result<(EntityId, Entities)> {
    let schema = registry.schema(key)?;
    let mut walker = Walker::new(registry);
    let id = schema.normalize(input, None, None, &mut walker)?;
    Ok((id, walker.into_entities()))
}

/// Denormalizes a root entity of type `key` from its id.
pub fn denormalize(
    registry: &SchemaRegistry,
    key: &str,
    id: &EntityId,
    entities: &Entities,
) -> Result<Object> {
    let schema = registry.schema(key)?;
    let mut walker = Walker::new(registry);
    schema.denormalize(&id.to_value(), &mut walker, entities)
}

/// One recorded `visit` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub key: String,
    pub value: Value,
    pub field: FieldSchema,
}

/// One recorded `add_entity` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Added {
    pub schema: String,
    pub processed: Object,
    pub input: Object,
}

/// Records every collaborator call and answers with predictable values:
/// `visit` returns `"visited:<key>"`, `unvisit` wraps the value as
/// `{"expanded": value}`.
#[derive(Debug, Default)]
pub struct Recorder {
    pub visits: Vec<Visit>,
    pub added: Vec<Added>,
    pub unvisits: Vec<(Value, FieldSchema)>,
}

impl Normalizer for Recorder {
    fn visit(
        &mut self,
        value: &Value,
        _parent: &Object,
        key: &str,
        field: &FieldSchema,
    ) -> Result<Value> {
        self.visits.push(Visit {
            key: key.to_string(),
            value: value.clone(),
            field: field.clone(),
        });
        Ok(json!(format!("visited:{key}")))
    }

    fn add_entity(
        &mut self,
        schema: &EntitySchema,
        processed: Object,
        input: &Object,
        _parent: Option<&Object>,
        _key: Option<&str>,
    ) -> Result<()> {
        self.added.push(Added {
            schema: schema.key().to_string(),
            processed,
            input: input.clone(),
        });
        Ok(())
    }
}

impl Denormalizer for Recorder {
    fn unvisit(&mut self, value: &Value, field: &FieldSchema, _entities: &Entities) -> Result<Value> {
        self.unvisits.push((value.clone(), field.clone()));
        Ok(json!({ "expanded": value }))
    }
}

/// Unwraps a `json!({...})` literal into an object.
pub fn obj(value: Value) -> Object {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
