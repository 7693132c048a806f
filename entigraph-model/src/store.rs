//! Reference entity store.
//!
//! Implements the commit half of a traversal engine: entities are keyed by
//! `(schema key, id)` and a second commit of the same pair is merged into
//! the first with the schema's merge strategy.

use entigraph_types::{Entities, Object, Result};
use tracing::debug;

use crate::schema::EntitySchema;

/// Accumulates normalized entities into an [`Entities`] table.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Entities,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that merges into an existing table.
    #[must_use]
    pub fn with_entities(entities: Entities) -> Self {
        Self { entities }
    }

    /// Commits a processed entity.
    ///
    /// The id is derived from the raw `input`, not from `processed`, so a
    /// process strategy may rename or drop the id field freely.
    pub fn add(
        &mut self,
        schema: &EntitySchema,
        processed: Object,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
    ) -> Result<()> {
        let id = schema.get_id(input, parent, key)?;
        let entity = match self.entities.get(schema.key(), &id) {
            Some(existing) => {
                debug!("Merging colliding entity {}/{}", schema.key(), id);
                schema.merge(existing, &processed)?
            }
            None => processed,
        };
        debug!("Committed entity {}/{}", schema.key(), id);
        self.entities.insert(schema.key(), id, entity);
        Ok(())
    }

    /// The table built so far.
    #[must_use]
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn into_entities(self) -> Entities {
        self.entities
    }
}
