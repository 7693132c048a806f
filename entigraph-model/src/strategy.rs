//! Strategy slots of an entity schema.
//!
//! Each slot is either a named built-in variant or a user-supplied hook.
//! Hook errors are returned as [`Error::Hook`] with the hook's own error
//! inside, untouched.

use entigraph_types::{EntityId, Error, HookError, Object, Result};
use std::fmt;
use std::sync::Arc;

/// Computes an id from `(input, parent, key)`.
pub type IdFn = Arc<
    dyn Fn(&Object, Option<&Object>, Option<&str>) -> std::result::Result<EntityId, HookError>
        + Send
        + Sync,
>;

/// Merges `(existing, incoming)` into one entity.
pub type MergeFn =
    Arc<dyn Fn(&Object, &Object) -> std::result::Result<Object, HookError> + Send + Sync>;

/// Produces the working copy of `(input, parent, key)` before field dispatch.
pub type ProcessFn = Arc<
    dyn Fn(&Object, Option<&Object>, Option<&str>) -> std::result::Result<Object, HookError>
        + Send
        + Sync,
>;

/// How an entity's identifier is derived.
#[derive(Clone)]
pub enum IdStrategy {
    /// Read the identifier from a named field of the raw input.
    Field(String),
    /// Derive the identifier with a function, e.g. for composite ids.
    Computed(IdFn),
}

impl IdStrategy {
    /// Shorthand for [`IdStrategy::Field`].
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Shorthand for [`IdStrategy::Computed`].
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Object, Option<&Object>, Option<&str>) -> std::result::Result<EntityId, HookError>
            + Send
            + Sync
            + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// Extracts the id of an entity of type `schema_key`.
    pub(crate) fn extract(
        &self,
        schema_key: &str,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
    ) -> Result<EntityId> {
        match self {
            Self::Field(name) => {
                let value = input.get(name).ok_or_else(|| Error::MissingId {
                    key: schema_key.to_string(),
                    field: name.clone(),
                })?;
                EntityId::from_value(value)
            }
            Self::Computed(f) => f(input, parent, key).map_err(Error::Hook),
        }
    }
}

impl Default for IdStrategy {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl fmt::Debug for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// How two normalized views of the same `(key, id)` are combined.
#[derive(Clone, Default)]
pub enum MergeStrategy {
    /// Incoming fields replace existing ones; existing-only fields survive.
    #[default]
    ShallowOverride,
    /// Existing fields are kept; incoming-only fields are added.
    PreferExisting,
    /// User-supplied merge.
    Custom(MergeFn),
}

impl MergeStrategy {
    /// Shorthand for [`MergeStrategy::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Object, &Object) -> std::result::Result<Object, HookError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub(crate) fn apply(&self, existing: &Object, incoming: &Object) -> Result<Object> {
        match self {
            Self::ShallowOverride => {
                let mut merged = existing.clone();
                for (field, value) in incoming {
                    merged.insert(field.clone(), value.clone());
                }
                Ok(merged)
            }
            Self::PreferExisting => {
                let mut merged = existing.clone();
                for (field, value) in incoming {
                    if !merged.contains_key(field) {
                        merged.insert(field.clone(), value.clone());
                    }
                }
                Ok(merged)
            }
            Self::Custom(f) => f(existing, incoming).map_err(Error::Hook),
        }
    }
}

impl fmt::Debug for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShallowOverride => f.write_str("ShallowOverride"),
            Self::PreferExisting => f.write_str("PreferExisting"),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// How the raw input is turned into the working copy that gets normalized.
#[derive(Clone, Default)]
pub enum ProcessStrategy {
    /// Shallow copy of the raw input. The caller's input is never touched.
    #[default]
    ShallowCopy,
    /// User-supplied processing, e.g. renaming or dropping fields.
    Custom(ProcessFn),
}

impl ProcessStrategy {
    /// Shorthand for [`ProcessStrategy::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Object, Option<&Object>, Option<&str>) -> std::result::Result<Object, HookError>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub(crate) fn apply(
        &self,
        input: &Object,
        parent: Option<&Object>,
        key: Option<&str>,
    ) -> Result<Object> {
        match self {
            Self::ShallowCopy => Ok(input.clone()),
            Self::Custom(f) => f(input, parent, key).map_err(Error::Hook),
        }
    }
}

impl fmt::Debug for ProcessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShallowCopy => f.write_str("ShallowCopy"),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}
