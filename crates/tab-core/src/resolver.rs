//! Model resolution: expands a model reference into its linearized chain of
//! ancestor attribute maps, most-base first.
//!
//! Each named model is expanded at most once per resolver. A name that was
//! already fully resolved is skipped when reached again (a diamond), while
//! a name that is still on the active resolution stack is a true cycle and
//! fails with [`TabError::CyclicInheritance`].

use std::collections::HashSet;

use crate::error::{TabError, TabResult};
use crate::model::{BASE_KEY, ModelRef, ModelStore, parse_bases};
use crate::value::Attributes;

/// Expands model references against a [`ModelStore`].
///
/// The visited set lives as long as the resolver, so one resolver shared
/// across several [`resolve`](Self::resolve) calls never yields the same
/// named model twice.
pub struct ModelResolver<'s> {
    store: &'s dyn ModelStore,
    completed: HashSet<String>,
    active: Vec<String>,
}

impl<'s> ModelResolver<'s> {
    /// Create a resolver with an empty visited set.
    pub fn new(store: &'s dyn ModelStore) -> Self {
        Self {
            store,
            completed: HashSet::new(),
            active: Vec::new(),
        }
    }

    /// Resolve `model` into ancestor attribute maps, most-base first.
    ///
    /// The returned maps never contain `base`. Models already resolved by
    /// this resolver contribute nothing.
    pub fn resolve(&mut self, model: &ModelRef) -> TabResult<Vec<Attributes>> {
        let mut out = Vec::new();
        match model {
            ModelRef::Named(name) => self.expand_named(name, &mut out)?,
            ModelRef::Inline(attrs) => self.expand_attributes(attrs.clone(), &mut out)?,
        }
        Ok(out)
    }

    /// True if `name` has already been fully resolved.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.completed.contains(name)
    }

    fn expand_named(&mut self, name: &str, out: &mut Vec<Attributes>) -> TabResult<()> {
        if self.completed.contains(name) {
            tracing::trace!(model = name, "skipping already resolved model");
            return Ok(());
        }
        if self.active.iter().any(|n| n == name) {
            let mut chain = self.active.clone();
            chain.push(name.to_string());
            return Err(TabError::CyclicInheritance { chain });
        }

        let attrs = self
            .store
            .lookup(name)?
            .ok_or_else(|| TabError::ModelNotFound(name.to_string()))?;

        self.active.push(name.to_string());
        let result = self.expand_attributes(attrs, out);
        self.active.pop();
        result?;

        tracing::debug!(model = name, "resolved model");
        self.completed.insert(name.to_string());
        Ok(())
    }

    fn expand_attributes(
        &mut self,
        mut attrs: Attributes,
        out: &mut Vec<Attributes>,
    ) -> TabResult<()> {
        if let Some(base) = attrs.remove(BASE_KEY) {
            for parent in parse_bases(&base)? {
                self.expand_named(&parent, out)?;
            }
        }
        out.push(attrs);
        Ok(())
    }
}
