use std::collections::HashMap;

use crate::error::{TabError, TabResult};
use crate::model::BEHAVIORS_KEY;
use crate::value::{Attributes, ThingId, Value};

/// A built thing: a mutable attribute bag with an identity.
///
/// Once built, a thing holds no reference to the models that produced it.
/// Its `behaviors` attribute is the ordered list consulted by the
/// dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    id: ThingId,
    attributes: Attributes,
}

impl Thing {
    /// Create a thing with a random ID.
    pub fn new(attributes: Attributes) -> Self {
        Self::with_id(ThingId::new(), attributes)
    }

    /// Create a thing with a pre-assigned ID.
    pub fn with_id(id: ThingId, attributes: Attributes) -> Self {
        Self { id, attributes }
    }

    /// This thing's identifier.
    pub fn id(&self) -> ThingId {
        self.id
    }

    /// All attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Look up one attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Mutable access to one attribute.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.attributes.get_mut(key)
    }

    /// True if the attribute is present (even if `null`).
    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Remove an attribute.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// The `name` attribute, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// Behavior names in dispatch order.
    pub fn behaviors(&self) -> Vec<&str> {
        self.get(BEHAVIORS_KEY)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Drop one behavior. Returns true if it was present.
    pub fn remove_behavior(&mut self, name: &str) -> bool {
        let Some(items) = self.get_mut(BEHAVIORS_KEY).and_then(Value::as_list_mut) else {
            return false;
        };
        let before = items.len();
        items.retain(|item| item.as_str() != Some(name));
        items.len() != before
    }

    /// Drop every behavior, leaving attributes untouched.
    pub fn clear_behaviors(&mut self) {
        self.set(BEHAVIORS_KEY, Value::List(Vec::new()));
    }
}

/// Owns built things so relation attributes can refer to each other by id.
#[derive(Debug, Clone, Default)]
pub struct World {
    things: HashMap<ThingId, Thing>,
    order: Vec<ThingId>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a thing to the world. Returns its ID.
    pub fn spawn(&mut self, thing: Thing) -> ThingId {
        let id = thing.id();
        if self.things.insert(id, thing).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Get a thing by ID.
    pub fn get(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(&id)
    }

    /// Get a mutable thing by ID.
    pub fn get_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.get_mut(&id)
    }

    /// Get a thing by ID or fail with [`TabError::ThingNotFound`].
    pub fn thing(&self, id: ThingId) -> TabResult<&Thing> {
        self.get(id).ok_or(TabError::ThingNotFound(id))
    }

    /// Mutable variant of [`thing`](Self::thing).
    pub fn thing_mut(&mut self, id: ThingId) -> TabResult<&mut Thing> {
        self.get_mut(id).ok_or(TabError::ThingNotFound(id))
    }

    /// Remove a thing. References held by other things are left dangling.
    pub fn remove(&mut self, id: ThingId) -> TabResult<Thing> {
        let thing = self.things.remove(&id).ok_or(TabError::ThingNotFound(id))?;
        self.order.retain(|t| *t != id);
        Ok(thing)
    }

    /// Find a thing by its `name` attribute (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Thing> {
        let name_lower = name.to_lowercase();
        self.iter()
            .find(|t| t.name().is_some_and(|n| n.to_lowercase() == name_lower))
    }

    /// Things in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Thing> {
        self.order.iter().filter_map(|id| self.things.get(id))
    }

    /// Number of things.
    pub fn len(&self) -> usize {
        self.things.len()
    }

    /// True if the world holds no things.
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::value::attributes_from_json;

    fn thing(json: serde_json::Value) -> Thing {
        Thing::new(attributes_from_json(json).unwrap())
    }

    #[test]
    fn behaviors_reads_ordered_names() {
        let t = thing(json!({"behaviors": ["ball", "object", "thing"]}));
        assert_eq!(t.behaviors(), vec!["ball", "object", "thing"]);
    }

    #[test]
    fn behaviors_empty_when_missing() {
        assert!(thing(json!({"mass": 1})).behaviors().is_empty());
    }

    #[test]
    fn remove_behavior_keeps_the_rest() {
        let mut t = thing(json!({"behaviors": ["thing", "object"]}));
        assert!(t.remove_behavior("object"));
        assert!(!t.remove_behavior("object"));
        assert_eq!(t.behaviors(), vec!["thing"]);
    }

    #[test]
    fn clear_behaviors_leaves_attributes() {
        let mut t = thing(json!({"behaviors": ["thing"], "mass": 1}));
        t.clear_behaviors();
        assert!(t.behaviors().is_empty());
        assert_eq!(t.get("mass"), Some(&Value::Integer(1)));
    }

    #[test]
    fn spawn_and_find_by_name() {
        let mut world = World::new();
        let id = world.spawn(thing(json!({"name": "Pebble"})));
        assert_eq!(world.len(), 1);
        assert_eq!(world.find_by_name("pebble").map(Thing::id), Some(id));
        assert!(world.find_by_name("boulder").is_none());
    }

    #[test]
    fn mutating_one_thing_leaves_others_alone() {
        let mut world = World::new();
        let a = world.spawn(thing(json!({"contents": []})));
        let b = world.spawn(thing(json!({"contents": []})));
        world
            .thing_mut(a)
            .unwrap()
            .get_mut("contents")
            .and_then(Value::as_list_mut)
            .unwrap()
            .push(Value::Thing(b));
        assert_eq!(world.thing(b).unwrap().get("contents"), Some(&Value::List(vec![])));
    }

    #[test]
    fn remove_unknown_thing_fails() {
        let mut world = World::new();
        let id = ThingId::new();
        assert!(matches!(world.remove(id), Err(TabError::ThingNotFound(x)) if x == id));
    }
}
