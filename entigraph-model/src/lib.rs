//! Entity schema descriptor for entigraph.
//!
//! An [`EntitySchema`] describes one entity type: how its identity is
//! derived, how two views of the same entity are merged, which of its
//! fields hold nested entities, and which computed fields are attached on
//! the way back out. It does not walk graphs itself; a traversal engine
//! drives it through the [`Normalizer`] and [`Denormalizer`] traits.
//!
//! - [`EntitySchema`] — the per-type descriptor (normalize / denormalize)
//! - [`IdStrategy`], [`MergeStrategy`], [`ProcessStrategy`] — strategy slots
//! - [`FieldSchema`] — statically tagged nested-field declarations
//! - [`SchemaRegistry`] — two-phase build for self and mutually recursive types
//! - [`EntityStore`] — reference `add_entity` with merge-on-collision
//! - [`SchemaConfig`] / [`RegistryConfig`] — declaring schemas from JSON

mod config;
mod field;
mod registry;
mod schema;
mod store;
mod strategy;
mod visitor;

pub use config::{MergeKind, RegistryConfig, SchemaConfig};
pub use entigraph_types::{Entities, EntityId, Error, HookError, Object, Result};
pub use field::{FieldSchema, Fields};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use schema::{EntitySchema, EntitySchemaBuilder};
pub use store::EntityStore;
pub use strategy::{IdFn, IdStrategy, MergeFn, MergeStrategy, ProcessFn, ProcessStrategy};
pub use visitor::{Denormalizer, Normalizer};
