use std::collections::HashMap;

use crate::error::{TabError, TabResult};
use crate::value::{Attributes, Value, attributes_from_json};

/// Reserved key naming a model's parent model(s).
pub const BASE_KEY: &str = "base";
/// Reserved key listing the attribute keys merged as unions.
pub const ADDITIVE_KEY: &str = "additiveAttributes";
/// Key holding a thing's ordered behavior names.
pub const BEHAVIORS_KEY: &str = "behaviors";

/// A reference to a model: either a catalog name or an inline attribute map.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRef {
    /// Look the model up in the model store by name.
    Named(String),
    /// An anonymous model given directly; it may still declare `base`.
    Inline(Attributes),
}

impl ModelRef {
    /// Reference a model by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Interpret a JSON value as a model reference.
    ///
    /// Strings are names and objects are inline models. Anything else
    /// fails with [`TabError::InvalidModelInput`].
    pub fn from_json(json: serde_json::Value) -> TabResult<Self> {
        match json {
            serde_json::Value::String(name) => Ok(Self::Named(name)),
            obj @ serde_json::Value::Object(_) => Ok(Self::Inline(attributes_from_json(obj)?)),
            other => Err(TabError::InvalidModelInput(format!(
                "a model must be a name or an attribute map, got {other}"
            ))),
        }
    }
}

impl From<&str> for ModelRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<Attributes> for ModelRef {
    fn from(attrs: Attributes) -> Self {
        Self::Inline(attrs)
    }
}

/// Read-only source of named model definitions.
pub trait ModelStore {
    /// Fetch the attributes of the model called `name`.
    ///
    /// Returns `Ok(None)` when no such model exists; `Err` is reserved for
    /// store failures such as an unreadable definition.
    fn lookup(&self, name: &str) -> TabResult<Option<Attributes>>;
}

/// Model store backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryModelStore {
    models: HashMap<String, Attributes>,
}

impl MemoryModelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a model.
    pub fn insert(&mut self, name: impl Into<String>, attrs: Attributes) {
        self.models.insert(name.into(), attrs);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_model(mut self, name: impl Into<String>, attrs: Attributes) -> Self {
        self.insert(name, attrs);
        self
    }

    /// Add a model given as a JSON object.
    pub fn with_json(self, name: impl Into<String>, json: serde_json::Value) -> TabResult<Self> {
        Ok(self.with_model(name, attributes_from_json(json)?))
    }

    /// Names of all stored models, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ModelStore for MemoryModelStore {
    fn lookup(&self, name: &str) -> TabResult<Option<Attributes>> {
        Ok(self.models.get(name).cloned())
    }
}

/// Parse a `base` declaration: a single name or a list of names.
pub fn parse_bases(base: &Value) -> TabResult<Vec<String>> {
    match base {
        Value::String(name) => Ok(vec![name.clone()]),
        Value::List(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    TabError::InvalidModelInput(format!("base names must be strings, got {item}"))
                })
            })
            .collect(),
        other => Err(TabError::InvalidModelInput(format!(
            "base must be a name or a list of names, got {other}"
        ))),
    }
}

/// Keys a model declares in `additiveAttributes`. Non-string entries are ignored.
pub fn declared_additive_keys(attrs: &Attributes) -> Vec<String> {
    match attrs.get(ADDITIVE_KEY) {
        Some(Value::List(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(key)) => vec![key.clone()],
        _ => Vec::new(),
    }
}
