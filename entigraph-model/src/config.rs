//! Declaring schemas from JSON.
//!
//! ```json
//! {
//!   "schemas": [
//!     {
//!       "key": "articles",
//!       "fields": { "author": {"entity": "users"}, "comments": {"collection": "comments"} }
//!     },
//!     { "key": "users", "id_attribute": "uuid", "merge": "prefer_existing" },
//!     { "key": "comments", "computed": { "kind": "comment" } }
//!   ]
//! }
//! ```
//!
//! Function strategies cannot be expressed here; use
//! [`EntitySchema::builder`] for those.

use entigraph_types::{Error, Object, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::Fields;
use crate::registry::SchemaRegistry;
use crate::schema::EntitySchema;
use crate::strategy::MergeStrategy;

/// Built-in merge strategies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeKind {
    #[default]
    ShallowOverride,
    PreferExisting,
}

impl From<MergeKind> for MergeStrategy {
    fn from(kind: MergeKind) -> Self {
        match kind {
            MergeKind::ShallowOverride => Self::ShallowOverride,
            MergeKind::PreferExisting => Self::PreferExisting,
        }
    }
}

/// Data-only description of one entity schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Kept as raw JSON so a missing or non-string key surfaces as
    /// [`Error::InvalidKind`] rather than a parse error.
    #[serde(default)]
    pub key: Value,
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,
    #[serde(default)]
    pub merge: MergeKind,
    #[serde(default, skip_serializing_if = "Object::is_empty")]
    pub computed: Object,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

fn default_id_attribute() -> String {
    "id".to_string()
}

impl SchemaConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the key and builds the schema.
    pub fn into_schema(self) -> Result<EntitySchema> {
        let key = match self.key {
            Value::String(key) => key,
            other => return Err(Error::InvalidKind(other.to_string())),
        };
        EntitySchema::builder(key)
            .id_attribute(self.id_attribute)
            .merge_strategy(self.merge.into())
            .computed(self.computed)
            .fields(self.fields)
            .build()
    }
}

impl TryFrom<SchemaConfig> for EntitySchema {
    type Error = Error;

    fn try_from(config: SchemaConfig) -> Result<Self> {
        config.into_schema()
    }
}

/// Data-only description of a whole schema registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub schemas: Vec<SchemaConfig>,
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declares every schema, then resolves all field references.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut builder = SchemaRegistry::builder();
        for config in self.schemas {
            builder.declare(config.into_schema()?)?;
        }
        builder.build()
    }
}
