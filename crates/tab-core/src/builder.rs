//! Thing construction: resolves the root, base, and addon model chains and
//! folds them left to right through the attribute merger.

use crate::error::TabResult;
use crate::merger::merge;
use crate::model::{ADDITIVE_KEY, BEHAVIORS_KEY, ModelRef, ModelStore, declared_additive_keys};
use crate::ordered_set::OrderedSet;
use crate::resolver::ModelResolver;
use crate::value::Attributes;
use crate::world::Thing;

/// Configuration for thing construction.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Model every thing starts from, and the default base.
    pub root_model: String,
    /// Keys treated as additive before any model declares them.
    pub default_additive: OrderedSet<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root_model: "thing".to_string(),
            default_additive: std::iter::once(BEHAVIORS_KEY.to_string()).collect(),
        }
    }
}

impl BuildConfig {
    /// Set the root model name.
    pub fn with_root_model(mut self, name: impl Into<String>) -> Self {
        self.root_model = name.into();
        self
    }

    /// Mark one more key additive from the start.
    pub fn with_additive(mut self, key: impl Into<String>) -> Self {
        self.default_additive.insert(key.into());
        self
    }
}

/// Builds [`Thing`]s from models in a [`ModelStore`].
pub struct ThingBuilder<'s> {
    store: &'s dyn ModelStore,
    config: BuildConfig,
}

impl<'s> ThingBuilder<'s> {
    /// Create a builder with the default configuration.
    pub fn new(store: &'s dyn ModelStore) -> Self {
        Self::with_config(store, BuildConfig::default())
    }

    /// Create a builder with a custom configuration.
    pub fn with_config(store: &'s dyn ModelStore, config: BuildConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a thing from an optional base model and an optional addon.
    ///
    /// The root model chain comes first, then `base` (the root model when
    /// absent), then `addon`. No model is merged twice in one build.
    /// Fails without producing a thing if any chain cannot be resolved.
    pub fn build(&self, base: Option<&ModelRef>, addon: Option<&ModelRef>) -> TabResult<Thing> {
        let mut resolver = ModelResolver::new(self.store);
        let root = ModelRef::Named(self.config.root_model.clone());

        let mut layers = resolver.resolve(&root)?;
        layers.extend(resolver.resolve(base.unwrap_or(&root))?);
        if let Some(addon) = addon {
            layers.extend(resolver.resolve(addon)?);
        }

        let mut attributes = self.fold(&layers);
        attributes.remove(ADDITIVE_KEY);

        let thing = Thing::new(attributes);
        tracing::debug!(
            thing = %thing.id(),
            layers = layers.len(),
            behaviors = ?thing.behaviors(),
            "built thing"
        );
        Ok(thing)
    }

    /// Build from JSON model references (name strings or objects).
    pub fn build_json(
        &self,
        base: Option<serde_json::Value>,
        addon: Option<serde_json::Value>,
    ) -> TabResult<Thing> {
        let base = base.map(ModelRef::from_json).transpose()?;
        let addon = addon.map(ModelRef::from_json).transpose()?;
        self.build(base.as_ref(), addon.as_ref())
    }

    /// Fold resolved layers through the merger, growing the additive key
    /// set with each layer's declarations before merging it.
    fn fold(&self, layers: &[Attributes]) -> Attributes {
        let mut additive = self.config.default_additive.clone();
        let mut acc = Attributes::new();
        for layer in layers {
            additive.extend(declared_additive_keys(layer));
            acc = merge(&acc, layer, &additive);
        }
        acc
    }
}
