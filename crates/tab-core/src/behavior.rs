use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::dispatcher::{Access, Dispatcher};
use crate::error::{TabError, TabResult};
use crate::value::{ThingId, Value};
use crate::world::{Thing, World};

/// A capability implementation. Receives the bound call context and the
/// explicit positional arguments.
pub type CapabilityFn = Arc<dyn Fn(&mut Call<'_>, &[Value]) -> TabResult<Value> + Send + Sync>;

/// A named, stateless table of capabilities.
#[derive(Clone)]
pub struct Behavior {
    name: String,
    capabilities: BTreeMap<String, CapabilityFn>,
}

impl Behavior {
    /// Create a behavior with no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeMap::new(),
        }
    }

    /// Add a capability.
    pub fn with<F>(mut self, capability: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Call<'_>, &[Value]) -> TabResult<Value> + Send + Sync + 'static,
    {
        self.capabilities.insert(capability.into(), Arc::new(func));
        self
    }

    /// The behavior's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up one capability.
    pub fn capability(&self, name: &str) -> Option<&CapabilityFn> {
        self.capabilities.get(name)
    }

    /// Names of all capabilities, sorted.
    pub fn capability_names(&self) -> impl Iterator<Item = &str> {
        self.capabilities.keys().map(String::as_str)
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Read-only source of behaviors by name.
pub trait BehaviorStore {
    /// Fetch the behavior called `name`, if known.
    fn lookup(&self, name: &str) -> Option<&Behavior>;
}

/// Behavior store backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Behavior>,
}

impl BehaviorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the builtin `thing`, `object`, and `ball` behaviors.
    pub fn builtin() -> Self {
        crate::builtin::all()
            .into_iter()
            .fold(Self::new(), Self::with_behavior)
    }

    /// Add or replace a behavior under its own name.
    pub fn register(&mut self, behavior: Behavior) {
        self.behaviors.insert(behavior.name().to_string(), behavior);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.register(behavior);
        self
    }

    /// Names of all registered behaviors, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.behaviors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl BehaviorStore for BehaviorRegistry {
    fn lookup(&self, name: &str) -> Option<&Behavior> {
        self.behaviors.get(name)
    }
}

/// The receiver binding handed to a capability while it runs.
///
/// Gives the capability read/write access to its receiver and to the rest
/// of the world, and lets it invoke further capabilities.
pub struct Call<'a> {
    world: &'a mut World,
    dispatcher: Dispatcher<'a>,
    receiver: ThingId,
    capability: &'a str,
}

impl<'a> Call<'a> {
    pub(crate) fn new(
        world: &'a mut World,
        dispatcher: Dispatcher<'a>,
        receiver: ThingId,
        capability: &'a str,
    ) -> Self {
        Self {
            world,
            dispatcher,
            receiver,
            capability,
        }
    }

    /// The thing the capability is bound to.
    pub fn receiver(&self) -> ThingId {
        self.receiver
    }

    /// Name of the capability being invoked.
    pub fn capability(&self) -> &str {
        self.capability
    }

    /// The receiver.
    pub fn this(&self) -> TabResult<&Thing> {
        self.world.thing(self.receiver)
    }

    /// The receiver, mutably.
    pub fn this_mut(&mut self) -> TabResult<&mut Thing> {
        self.world.thing_mut(self.receiver)
    }

    /// The whole world.
    pub fn world(&self) -> &World {
        self.world
    }

    /// The whole world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        self.world
    }

    /// Attribute-or-capability access on any thing.
    pub fn access(&self, id: ThingId, name: &str) -> TabResult<Access<'_>> {
        self.dispatcher.access(self.world, id, name)
    }

    /// Invoke a capability on the receiver.
    pub fn invoke_self(&mut self, name: &str, args: &[Value]) -> TabResult<Value> {
        self.dispatcher.invoke(self.world, self.receiver, name, args)
    }

    /// Build an [`TabError::InvalidArgument`] for the running capability.
    pub fn invalid_argument(&self, reason: impl Into<String>) -> TabError {
        TabError::InvalidArgument {
            capability: self.capability.to_string(),
            reason: reason.into(),
        }
    }
}

/// A capability resolved for a specific thing, ready to call.
#[derive(Clone)]
pub struct BoundCapability {
    behavior: String,
    name: String,
    receiver: ThingId,
    func: CapabilityFn,
}

impl BoundCapability {
    pub(crate) fn new(behavior: &str, name: &str, receiver: ThingId, func: CapabilityFn) -> Self {
        Self {
            behavior: behavior.to_string(),
            name: name.to_string(),
            receiver,
            func,
        }
    }

    /// Behavior that provided the capability.
    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Capability name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound receiver.
    pub fn receiver(&self) -> ThingId {
        self.receiver
    }

    /// Run the capability against `world`.
    pub fn call(
        &self,
        world: &mut World,
        dispatcher: Dispatcher<'_>,
        args: &[Value],
    ) -> TabResult<Value> {
        let mut call = Call::new(world, dispatcher, self.receiver, &self.name);
        (self.func)(&mut call, args)
    }
}

impl fmt::Debug for BoundCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundCapability")
            .field("behavior", &self.behavior)
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .finish_non_exhaustive()
    }
}
