//! Core type definitions for entigraph.
//!
//! This crate defines the vocabulary shared between entity schemas and
//! whatever traversal engine drives them:
//! - [`EntityId`] — opaque, hashable entity identifiers
//! - [`Entities`] — the flat `entity key -> id -> entity` table
//! - [`Error`] — every failure an entity schema or its hooks can surface
//!
//! Nothing here walks a graph. Traversal lives with the caller.

mod entities;
mod ids;

pub use entities::{Entities, Object};
pub use ids::EntityId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by user-supplied strategy hooks (id, merge, process).
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building schemas or moving entities
/// in and out of the entity table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A schema key was missing, not a string, or empty.
    #[error("expected a non-empty string key for entity schema, but found {0}")]
    InvalidKind(String),

    #[error("invalid entity id: {0} (expected a string or an integer)")]
    InvalidId(serde_json::Value),

    #[error("{key} entity has no id attribute `{field}`")]
    MissingId { key: String, field: String },

    #[error("entity not found: {key}/{id}")]
    MissingEntity { key: String, id: EntityId },

    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    #[error("schema already declared: {0}")]
    DuplicateSchema(String),

    #[error("field `{field}` of schema {owner} references undeclared schema {target}")]
    UnresolvedSchema {
        owner: String,
        field: String,
        target: String,
    },

    /// Failure raised by a user-supplied strategy. Displays as the hook's
    /// own message and exposes the hook's error as `source`.
    #[error("{0}")]
    Hook(#[from] HookError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
