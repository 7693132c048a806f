//! Collaborator contracts supplied by the traversal engine.
//!
//! An [`EntitySchema`] only decides what happens at a single entity
//! boundary. Walking into children, dispatching on their field schema and
//! storing entities are the engine's job, reached through these traits.

use entigraph_types::{Entities, Object, Result};
use serde_json::Value;

use crate::field::FieldSchema;
use crate::schema::EntitySchema;

/// The normalizing half of a traversal engine.
pub trait Normalizer {
    /// Normalizes a nested value found at `parent[key]` according to
    /// `schema`, returning what the parent should hold in its place
    /// (usually an id or an array of ids).
    fn visit(
        &mut self,
        value: &Value,
        parent: &Object,
        key: &str,
        schema: &FieldSchema,
    ) -> Result<Value>;

    /// Commits a processed entity to the entity table, merging on
    /// collision. `input`, `parent` and `key` are the raw arguments the
    /// entity was normalized with, for id derivation.
    fn add_entity(
        &mut self,
        schema: &EntitySchema,
        processed: Object,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
    ) -> Result<()>;
}

/// The denormalizing half of a traversal engine.
pub trait Denormalizer {
    /// Expands a normalized value (usually an id or an array of ids) back
    /// into full entities according to `schema`.
    fn unvisit(&mut self, value: &Value, schema: &FieldSchema, entities: &Entities)
    -> Result<Value>;
}
