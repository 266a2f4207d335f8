//! Core engine for TAB (Things with Attributes and Behaviors).
//!
//! Things are made from models. A model is a named bag of attributes that
//! may inherit from one or more base models; the [`ThingBuilder`] resolves
//! the inheritance chain, merges attributes under per-key policies, and
//! produces a [`Thing`]. Calls on a thing are resolved lazily by the
//! [`Dispatcher`], which scans the thing's ordered behavior list for the
//! first behavior providing the requested capability.
//!
//! Models and behaviors come from injected stores ([`ModelStore`],
//! [`BehaviorStore`]), so the engine itself performs no I/O unless given a
//! [`CatalogModelStore`].

/// Behavior tables, the behavior store, and the capability call context.
pub mod behavior;
/// Thing construction from model chains.
pub mod builder;
/// Builtin `thing`, `object`, and `ball` behaviors.
pub mod builtin;
/// JSON catalog directory model store.
pub mod catalog;
/// Attribute and capability dispatch on built things.
pub mod dispatcher;
/// Error types used throughout the crate.
pub mod error;
/// Attribute merging under additive and override policies.
pub mod merger;
/// Model references, reserved keys, and the model store.
pub mod model;
/// Insertion-ordered unique sequences.
pub mod ordered_set;
/// Inheritance chain resolution.
pub mod resolver;
/// Dynamically typed attribute values.
pub mod value;
/// Built things and the world that owns them.
pub mod world;

/// Re-export behavior types.
pub use behavior::{Behavior, BehaviorRegistry, BehaviorStore, BoundCapability, Call};
/// Re-export builder types.
pub use builder::{BuildConfig, ThingBuilder};
/// Re-export catalog types.
pub use catalog::{CatalogConfig, CatalogModelStore};
/// Re-export dispatcher types.
pub use dispatcher::{Access, Dispatcher};
/// Re-export error types.
pub use error::{TabError, TabResult};
/// Re-export model types.
pub use model::{MemoryModelStore, ModelRef, ModelStore};
/// Re-export the ordered set.
pub use ordered_set::OrderedSet;
/// Re-export the resolver.
pub use resolver::ModelResolver;
/// Re-export value types.
pub use value::{Attributes, ThingId, Value};
/// Re-export world types.
pub use world::{Thing, World};
