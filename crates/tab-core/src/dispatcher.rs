//! Capability dispatch on built things.
//!
//! Own attributes always win. Only when the name is not an attribute are
//! the thing's behaviors scanned, in order, for a capability with that
//! name; the first behavior that provides it wins. A miss is not an error:
//! it comes back as [`Access::Absent`] so callers can feature-detect.

use crate::behavior::{BehaviorStore, BoundCapability};
use crate::error::{TabError, TabResult};
use crate::value::{ThingId, Value};
use crate::world::{Thing, World};

/// Result of looking up a name on a thing.
#[derive(Debug)]
pub enum Access<'w> {
    /// The thing has an attribute with this name.
    Attribute(&'w Value),
    /// A behavior provides a capability with this name.
    Capability(BoundCapability),
    /// Neither an attribute nor a capability.
    Absent,
}

impl Access<'_> {
    /// True unless [`Access::Absent`].
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// The bound capability, if this access resolved to one.
    pub fn into_capability(self) -> Option<BoundCapability> {
        match self {
            Self::Capability(capability) => Some(capability),
            _ => None,
        }
    }
}

/// Resolves attribute and capability access against a [`BehaviorStore`].
///
/// Holds no state of its own; repeated lookups against an unchanged thing
/// give the same answer.
#[derive(Clone, Copy)]
pub struct Dispatcher<'b> {
    behaviors: &'b dyn BehaviorStore,
}

impl<'b> Dispatcher<'b> {
    /// Create a dispatcher over a behavior store.
    pub fn new(behaviors: &'b dyn BehaviorStore) -> Self {
        Self { behaviors }
    }

    /// Look `name` up on thing `id`: attribute first, then behaviors.
    pub fn access<'w>(&self, world: &'w World, id: ThingId, name: &str) -> TabResult<Access<'w>> {
        let thing = world.thing(id)?;
        if let Some(value) = thing.get(name) {
            return Ok(Access::Attribute(value));
        }
        Ok(match self.capability(thing, name)? {
            Some(capability) => Access::Capability(capability),
            None => Access::Absent,
        })
    }

    /// Scan the thing's behaviors for `name`, ignoring attributes.
    ///
    /// Fails with [`TabError::BehaviorNotFound`] if a behavior listed
    /// before the match is unknown to the store.
    pub fn capability(&self, thing: &Thing, name: &str) -> TabResult<Option<BoundCapability>> {
        for behavior_name in thing.behaviors() {
            let behavior = self
                .behaviors
                .lookup(behavior_name)
                .ok_or_else(|| TabError::BehaviorNotFound(behavior_name.to_string()))?;
            if let Some(func) = behavior.capability(name) {
                tracing::debug!(
                    thing = %thing.id(),
                    capability = name,
                    behavior = behavior_name,
                    "resolved capability"
                );
                return Ok(Some(BoundCapability::new(
                    behavior_name,
                    name,
                    thing.id(),
                    func.clone(),
                )));
            }
        }
        Ok(None)
    }

    /// Feature detection: true if `name` is an attribute or a capability.
    pub fn has(&self, world: &World, id: ThingId, name: &str) -> TabResult<bool> {
        Ok(self.access(world, id, name)?.is_present())
    }

    /// True if a behavior provides `name`, whether or not an attribute shadows it.
    pub fn has_capability(&self, world: &World, id: ThingId, name: &str) -> TabResult<bool> {
        Ok(self.capability(world.thing(id)?, name)?.is_some())
    }

    /// Invoke capability `name` on thing `id`.
    ///
    /// Fails with [`TabError::NoSuchCapability`] when the name is absent or
    /// resolves to an attribute, which is not callable.
    pub fn invoke(
        &self,
        world: &mut World,
        id: ThingId,
        name: &str,
        args: &[Value],
    ) -> TabResult<Value> {
        let capability = self
            .access(world, id, name)?
            .into_capability()
            .ok_or_else(|| TabError::NoSuchCapability(name.to_string()))?;
        capability.call(world, *self, args)
    }
}
