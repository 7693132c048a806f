//! The entity schema descriptor.
//!
//! One [`EntitySchema`] exists per entity type. It is configured once and
//! then used read-only; normalize and denormalize touch no state of their
//! own; all recursion and all writes to the entity table go through the
//! caller's [`Normalizer`] / [`Denormalizer`].

use entigraph_types::{Entities, EntityId, Error, HookError, Object, Result};
use serde_json::Value;
use tracing::{debug, trace};

use crate::field::{FieldSchema, Fields};
use crate::strategy::{IdStrategy, MergeStrategy, ProcessStrategy};
use crate::visitor::{Denormalizer, Normalizer};

/// Describes one entity type: identity, merge policy, input processing,
/// computed fields and nested fields.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    key: String,
    id: IdStrategy,
    merge: MergeStrategy,
    process: ProcessStrategy,
    computed: Object,
    fields: Fields,
}

impl EntitySchema {
    /// Creates a schema with default strategies and no nested fields.
    ///
    /// Fails with [`Error::InvalidKind`] if `key` is empty.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        Self::builder(key).build()
    }

    /// Starts building a schema for the entity type `key`.
    pub fn builder(key: impl Into<String>) -> EntitySchemaBuilder {
        EntitySchemaBuilder::new(key)
    }

    /// The entity type name, used as the bucket name in [`Entities`].
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn id_strategy(&self) -> &IdStrategy {
        &self.id
    }

    #[must_use]
    pub fn merge_strategy(&self) -> &MergeStrategy {
        &self.merge
    }

    #[must_use]
    pub fn process_strategy(&self) -> &ProcessStrategy {
        &self.process
    }

    /// Fields attached to every denormalized entity.
    #[must_use]
    pub fn computed(&self) -> &Object {
        &self.computed
    }

    /// All nested field declarations.
    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The declaration for one field, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Adds field declarations. A field that is already declared is
    /// replaced; every other existing field is kept.
    pub fn define<I, K>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, FieldSchema)>,
        K: Into<String>,
    {
        for (name, schema) in fields {
            let name = name.into();
            if let Some(previous) = self.fields.insert(name.clone(), schema) {
                debug!("Redefined field {}.{} (was {:?})", self.key, name, previous);
            }
        }
    }

    /// Derives the identifier of `input` with the configured id strategy.
    pub fn get_id(
        &self,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
    ) -> Result<EntityId> {
        self.id.extract(&self.key, input, parent, key)
    }

    /// Combines two normalized views of the same entity with the
    /// configured merge strategy.
    pub fn merge(&self, existing: &Object, incoming: &Object) -> Result<Object> {
        self.merge.apply(existing, incoming)
    }

    /// Normalizes one entity.
    ///
    /// The processed copy has each declared nested field replaced by what
    /// `normalizer.visit` returns for it, is committed through
    /// `normalizer.add_entity`, and the entity's id is returned so the
    /// parent can hold it as a reference.
    pub fn normalize<N>(
        &self,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
        normalizer: &mut N,
    ) -> Result<EntityId>
    where
        N: Normalizer + ?Sized,
    {
        let mut processed = self.process.apply(input, parent, key)?;

        for (name, field) in &self.fields {
            let Some(value) = processed.get(name) else {
                continue;
            };
            if !field.accepts(value) {
                continue;
            }
            trace!("Visiting {}.{} as {:?}", self.key, name, field);
            let normalized = normalizer.visit(value, &processed, name, field)?;
            processed.insert(name.clone(), normalized);
        }

        normalizer.add_entity(self, processed, input, parent, key)?;
        self.get_id(input, parent, key)
    }

    /// Rebuilds one entity from either an entity object or an id.
    ///
    /// Objects are expanded as given; anything else is read as an id and
    /// looked up in `entities`. An id with no entry fails with
    /// [`Error::MissingEntity`]. Computed fields are applied last and
    /// override same-named stored fields.
    pub fn denormalize<D>(
        &self,
        entity_or_id: &Value,
        denormalizer: &mut D,
        entities: &Entities,
    ) -> Result<Object>
    where
        D: Denormalizer + ?Sized,
    {
        let mut entity = match entity_or_id {
            Value::Object(entity) => entity.clone(),
            other => {
                let id = EntityId::from_value(other)?;
                entities
                    .get(&self.key, &id)
                    .cloned()
                    .ok_or_else(|| Error::MissingEntity {
                        key: self.key.clone(),
                        id,
                    })?
            }
        };

        for (name, field) in &self.fields {
            if !field.is_nested() {
                continue;
            }
            let Some(value) = entity.get(name) else {
                continue;
            };
            trace!("Unvisiting {}.{} as {:?}", self.key, name, field);
            let expanded = denormalizer.unvisit(value, field, entities)?;
            entity.insert(name.clone(), expanded);
        }

        for (name, value) in &self.computed {
            entity.insert(name.clone(), value.clone());
        }

        Ok(entity)
    }
}

/// Builder for [`EntitySchema`]. Every strategy slot starts at its default.
#[derive(Debug, Clone)]
pub struct EntitySchemaBuilder {
    key: String,
    id: IdStrategy,
    merge: MergeStrategy,
    process: ProcessStrategy,
    computed: Object,
    fields: Fields,
}

impl EntitySchemaBuilder {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: IdStrategy::default(),
            merge: MergeStrategy::default(),
            process: ProcessStrategy::default(),
            computed: Object::new(),
            fields: Fields::new(),
        }
    }

    /// Reads the id from the named field (default: `"id"`).
    pub fn id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id = IdStrategy::Field(name.into());
        self
    }

    /// Derives the id with a function.
    pub fn id_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Object, Option<&Object>, Option<&str>) -> std::result::Result<EntityId, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.id = IdStrategy::computed(f);
        self
    }

    /// Sets the id strategy directly.
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id = strategy;
        self
    }

    /// Sets the merge strategy applied on `(key, id)` collisions.
    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge = strategy;
        self
    }

    /// Merges colliding entities with a function.
    pub fn merge_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Object, &Object) -> std::result::Result<Object, HookError> + Send + Sync + 'static,
    {
        self.merge = MergeStrategy::custom(f);
        self
    }

    /// Sets how the raw input becomes the working copy.
    pub fn process_strategy(mut self, strategy: ProcessStrategy) -> Self {
        self.process = strategy;
        self
    }

    /// Processes the raw input with a function before field dispatch.
    pub fn process_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Object, Option<&Object>, Option<&str>) -> std::result::Result<Object, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.process = ProcessStrategy::custom(f);
        self
    }

    /// Replaces the computed field set.
    pub fn computed(mut self, computed: Object) -> Self {
        self.computed = computed;
        self
    }

    /// Adds one computed field.
    pub fn computed_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.computed.insert(name.into(), value.into());
        self
    }

    /// Declares one nested field.
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Declares several nested fields.
    pub fn fields<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldSchema)>,
        K: Into<String>,
    {
        self.fields
            .extend(fields.into_iter().map(|(name, schema)| (name.into(), schema)));
        self
    }

    /// Validates the key and produces the schema.
    pub fn build(self) -> Result<EntitySchema> {
        if self.key.is_empty() {
            return Err(Error::InvalidKind(format!("{:?}", self.key)));
        }
        Ok(EntitySchema {
            key: self.key,
            id: self.id,
            merge: self.merge,
            process: self.process,
            computed: self.computed,
            fields: self.fields,
        })
    }
}
