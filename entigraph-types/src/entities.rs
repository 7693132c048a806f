//! The flat entity table produced by normalization.
//!
//! Shape: `entity key -> id -> entity object`. Each bucket is unordered;
//! nothing may rely on insertion order.

use serde::ser::{Error as _, SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::EntityId;

/// A JSON object: the body of one entity.
pub type Object = Map<String, Value>;

/// Normalized entities bucketed by schema key, then by id.
///
/// Serializes as nested JSON objects keyed by the id's display form. A
/// bucket holding both `5` and `"5"` cannot be written that way and fails
/// to serialize instead of dropping one of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    buckets: HashMap<String, HashMap<EntityId, Object>>,
}

impl Entities {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up one entity.
    #[must_use]
    pub fn get(&self, key: &str, id: &EntityId) -> Option<&Object> {
        self.buckets.get(key).and_then(|bucket| bucket.get(id))
    }

    /// Returns true if an entity with this key and id is present.
    #[must_use]
    pub fn contains(&self, key: &str, id: &EntityId) -> bool {
        self.get(key, id).is_some()
    }

    /// Stores an entity, returning whatever was previously stored under
    /// the same `(key, id)`.
    pub fn insert(&mut self, key: &str, id: EntityId, entity: Object) -> Option<Object> {
        self.buckets
            .entry(key.to_string())
            .or_default()
            .insert(id, entity)
    }

    /// Removes an entity and returns it.
    pub fn remove(&mut self, key: &str, id: &EntityId) -> Option<Object> {
        self.buckets.get_mut(key).and_then(|bucket| bucket.remove(id))
    }

    /// Returns every entity stored under one schema key.
    #[must_use]
    pub fn bucket(&self, key: &str) -> Option<&HashMap<EntityId, Object>> {
        self.buckets.get(key)
    }

    /// Iterates over the schema keys that have at least one bucket.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Total number of entities across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Entities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, entities) in &self.buckets {
            map.serialize_entry(key, &Bucket { key, entities })?;
        }
        map.end()
    }
}

struct Bucket<'a> {
    key: &'a str,
    entities: &'a HashMap<EntityId, Object>,
}

impl Serialize for Bucket<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seen = HashSet::with_capacity(self.entities.len());
        let mut map = serializer.serialize_map(Some(self.entities.len()))?;
        for (id, entity) in self.entities {
            let rendered = id.to_string();
            if !seen.insert(rendered.clone()) {
                return Err(S::Error::custom(format!(
                    "ambiguous ids in {}: {} is both an integer and a string id",
                    self.key, rendered
                )));
            }
            map.serialize_entry(&rendered, entity)?;
        }
        map.end()
    }
}
