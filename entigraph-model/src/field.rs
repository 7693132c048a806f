use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name -> nested field declaration.
pub type Fields = BTreeMap<String, FieldSchema>;

/// Declares what a field of an entity holds.
///
/// Schema targets are referenced by key and resolved through a
/// [`SchemaRegistry`](crate::SchemaRegistry), which lets a type point at
/// itself or at a type declared later.
///
/// JSON form: `{"entity": "users"}`, `{"collection": "tags"}`, `"passthrough"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSchema {
    /// A single nested entity of the named schema.
    Entity(String),
    /// An array of nested entities of the named schema.
    Collection(String),
    /// A plain value. Never recursed into.
    Passthrough,
}

impl FieldSchema {
    /// Shorthand for a single-entity field.
    pub fn entity(key: impl Into<String>) -> Self {
        Self::Entity(key.into())
    }

    /// Shorthand for a collection field.
    pub fn collection(key: impl Into<String>) -> Self {
        Self::Collection(key.into())
    }

    /// The schema key this field refers to, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Entity(key) | Self::Collection(key) => Some(key),
            Self::Passthrough => None,
        }
    }

    /// Returns true if `value` has the shape this field declares and so
    /// should be handed to the traversal engine during normalization.
    ///
    /// Anything else (scalars, null, an id that is already normalized) is
    /// left where it is.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Entity(_), Value::Object(_)) | (Self::Collection(_), Value::Array(_))
        )
    }

    /// Returns true if this field is expanded during denormalization.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}
