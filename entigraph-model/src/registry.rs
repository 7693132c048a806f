//! Two-phase schema registry.
//!
//! Phase one declares every entity type; field references are plain keys
//! and may point at types that are not declared yet (or at the type
//! itself). Phase two, [`SchemaRegistryBuilder::build`], checks that every
//! reference resolves. The built registry is read-only.

use entigraph_types::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

use crate::field::FieldSchema;
use crate::schema::EntitySchema;

/// Collects schema declarations before references are resolved.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<String, EntitySchema>,
}

impl SchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an entity type. Each key may be declared once.
    pub fn declare(&mut self, schema: EntitySchema) -> Result<&mut Self> {
        if self.schemas.contains_key(schema.key()) {
            return Err(Error::DuplicateSchema(schema.key().to_string()));
        }
        self.schemas.insert(schema.key().to_string(), schema);
        Ok(self)
    }

    /// Adds field declarations to an already declared type.
    pub fn define<I, K>(&mut self, key: &str, fields: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, FieldSchema)>,
        K: Into<String>,
    {
        let schema = self
            .schemas
            .get_mut(key)
            .ok_or_else(|| Error::UnknownSchema(key.to_string()))?;
        schema.define(fields);
        Ok(self)
    }

    /// Resolves every field reference and seals the registry.
    pub fn build(self) -> Result<SchemaRegistry> {
        for schema in self.schemas.values() {
            for (field, declared) in schema.fields() {
                let Some(target) = declared.target() else {
                    continue;
                };
                if !self.schemas.contains_key(target) {
                    return Err(Error::UnresolvedSchema {
                        owner: schema.key().to_string(),
                        field: field.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        debug!("Built schema registry with {} entity types", self.schemas.len());
        Ok(SchemaRegistry {
            schemas: self.schemas,
        })
    }
}

/// A resolved, read-only set of entity schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EntitySchema> {
        self.schemas.get(key)
    }

    /// Like [`get`](Self::get), but fails with [`Error::UnknownSchema`].
    pub fn schema(&self, key: &str) -> Result<&EntitySchema> {
        self.get(key)
            .ok_or_else(|| Error::UnknownSchema(key.to_string()))
    }

    /// The schema a nested field points at. `Passthrough` resolves to `None`.
    pub fn resolve(&self, field: &FieldSchema) -> Result<Option<&EntitySchema>> {
        field.target().map(|key| self.schema(key)).transpose()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
