//! Builtin behaviors: `thing`, `object`, and `ball`.

use crate::behavior::{Behavior, Call};
use crate::error::TabResult;
use crate::value::{ThingId, Value};

/// Every builtin behavior.
pub fn all() -> Vec<Behavior> {
    vec![thing(), object(), ball()]
}

/// Naming and description for every thing.
pub fn thing() -> Behavior {
    Behavior::new("thing")
        .with("fullName", full_name)
        .with("describe", describe)
}

/// Physical objects: weight and movement between containers.
pub fn object() -> Behavior {
    Behavior::new("object")
        .with("weigh", weigh)
        .with("moveTo", move_to)
}

/// Things that bounce.
pub fn ball() -> Behavior {
    Behavior::new("ball").with("bounce", |_call, _args| Ok(Value::from("boing!")))
}

fn full_name(call: &mut Call<'_>, _args: &[Value]) -> TabResult<Value> {
    let this = call.this()?;
    let name = this.name().unwrap_or("thing");
    let article = this
        .get("grammar")
        .and_then(Value::as_map)
        .and_then(|grammar| grammar.get("article"))
        .and_then(Value::as_str);

    let full = match article {
        Some("") => name.to_string(),
        Some(article) => format!("{article} {name}"),
        None => format!("{} {name}", indefinite_article(name)),
    };
    Ok(Value::String(full))
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn describe(call: &mut Call<'_>, _args: &[Value]) -> TabResult<Value> {
    if let Some(description) = call.this()?.get("description").and_then(Value::as_str) {
        return Ok(Value::from(description));
    }
    let full_name = call.invoke_self("fullName", &[])?;
    Ok(Value::String(format!("This is {full_name}.")))
}

fn weigh(call: &mut Call<'_>, _args: &[Value]) -> TabResult<Value> {
    Ok(call.this()?.get("mass").cloned().unwrap_or(Value::Null))
}

/// Put the receiver into `destination`'s contents.
///
/// A destination without a `contents` list is left alone and the call is
/// a no-op. The receiver leaves the `contents` of its previous location and
/// is listed at most once in the new one.
fn move_to(call: &mut Call<'_>, args: &[Value]) -> TabResult<Value> {
    let destination = match args.first() {
        Some(Value::Thing(id)) => *id,
        Some(other) => {
            return Err(call.invalid_argument(format!("destination must be a thing, got {other}")));
        }
        None => return Err(call.invalid_argument("missing destination")),
    };

    // Read as a plain attribute: the destination's behaviors play no part.
    let accepts = matches!(
        call.world().thing(destination)?.get("contents"),
        Some(Value::List(_))
    );
    if !accepts {
        tracing::debug!(
            thing = %call.receiver(),
            destination = %destination,
            "destination has no contents, not moving"
        );
        return Ok(Value::Null);
    }

    let receiver = call.receiver();
    let entry = Value::Thing(receiver);
    let previous = call.this()?.get("location").and_then(Value::as_thing);
    if let Some(previous) = previous.filter(|&previous| previous != destination) {
        if let Some(contents) = contents_of(call, previous) {
            contents.retain(|item| item != &entry);
        }
    }
    if let Some(contents) = contents_of(call, destination) {
        if !contents.contains(&entry) {
            contents.push(entry);
        }
    }
    call.this_mut()?.set("location", Value::Thing(destination));
    Ok(Value::Null)
}

fn contents_of<'c>(call: &'c mut Call<'_>, id: ThingId) -> Option<&'c mut Vec<Value>> {
    call.world_mut()
        .get_mut(id)?
        .get_mut("contents")
        .and_then(Value::as_list_mut)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::behavior::BehaviorRegistry;
    use crate::dispatcher::Dispatcher;
    use crate::error::TabError;
    use crate::value::attributes_from_json;
    use crate::world::{Thing, World};

    fn spawn(world: &mut World, json: serde_json::Value) -> ThingId {
        world.spawn(Thing::new(attributes_from_json(json).unwrap()))
    }

    fn full_name_of(json: serde_json::Value) -> String {
        let registry = BehaviorRegistry::builtin();
        let mut world = World::new();
        let id = spawn(&mut world, json);
        Dispatcher::new(&registry)
            .invoke(&mut world, id, "fullName", &[])
            .unwrap()
            .to_string()
    }

    #[test]
    fn full_name_uses_indefinite_article() {
        assert_eq!(full_name_of(json!({"behaviors": ["thing"]})), "a thing");
        assert_eq!(full_name_of(json!({"name": "pebble", "behaviors": ["thing"]})), "a pebble");
        assert_eq!(full_name_of(json!({"name": "Orb", "behaviors": ["thing"]})), "an Orb");
    }

    #[test]
    fn full_name_prefers_grammar_article() {
        let named = json!({"name": "box", "grammar": {"article": "the"}, "behaviors": ["thing"]});
        assert_eq!(full_name_of(named), "the box");
        let bare = json!({"name": "Kael", "grammar": {"article": ""}, "behaviors": ["thing"]});
        assert_eq!(full_name_of(bare), "Kael");
    }

    #[test]
    fn describe_falls_back_to_full_name() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let plain = spawn(&mut world, json!({"name": "marble", "behaviors": ["thing"]}));
        let described = spawn(
            &mut world,
            json!({"description": "A dusty crate.", "behaviors": ["thing"]}),
        );

        let lines = [plain, described]
            .into_iter()
            .map(|id| dispatcher.invoke(&mut world, id, "describe", &[]).unwrap().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(lines, @r"
        This is a marble.
        A dusty crate.
        ");
    }

    #[test]
    fn weigh_returns_mass() {
        let registry = BehaviorRegistry::builtin();
        let mut world = World::new();
        let id = spawn(&mut world, json!({"mass": 1, "behaviors": ["object"]}));
        let dispatcher = Dispatcher::new(&registry);
        assert_eq!(dispatcher.invoke(&mut world, id, "weigh", &[]).unwrap(), Value::Integer(1));
    }

    #[test]
    fn move_to_container() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"name": "pebble", "behaviors": ["object"]}));
        let box_id = spawn(&mut world, json!({"name": "box", "contents": []}));

        dispatcher
            .invoke(&mut world, pebble, "moveTo", &[Value::Thing(box_id)])
            .unwrap();

        assert_eq!(
            world.thing(box_id).unwrap().get("contents"),
            Some(&Value::List(vec![Value::Thing(pebble)]))
        );
        assert_eq!(
            world.thing(pebble).unwrap().get("location"),
            Some(&Value::Thing(box_id))
        );
    }

    #[test]
    fn move_to_non_container_is_a_no_op() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"name": "pebble", "behaviors": ["object"]}));
        let rock = spawn(&mut world, json!({"name": "rock"}));
        let before = world.thing(pebble).unwrap().clone();

        let result = dispatcher.invoke(&mut world, pebble, "moveTo", &[Value::Thing(rock)]);

        assert_eq!(result.unwrap(), Value::Null);
        assert_eq!(world.thing(pebble).unwrap(), &before);
        assert!(!world.thing(rock).unwrap().contains("contents"));
    }

    #[test]
    fn move_to_same_container_twice_lists_receiver_once() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"name": "pebble", "behaviors": ["object"]}));
        let box_id = spawn(&mut world, json!({"name": "box", "contents": []}));

        for _ in 0..2 {
            dispatcher
                .invoke(&mut world, pebble, "moveTo", &[Value::Thing(box_id)])
                .unwrap();
        }

        assert_eq!(
            world.thing(box_id).unwrap().get("contents"),
            Some(&Value::List(vec![Value::Thing(pebble)]))
        );
    }

    #[test]
    fn move_to_leaves_previous_container() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"name": "pebble", "behaviors": ["object"]}));
        let marble = spawn(&mut world, json!({"name": "marble", "behaviors": ["object"]}));
        let bag = spawn(&mut world, json!({"name": "bag", "contents": []}));
        let box_id = spawn(&mut world, json!({"name": "box", "contents": []}));

        for id in [marble, pebble] {
            dispatcher
                .invoke(&mut world, id, "moveTo", &[Value::Thing(bag)])
                .unwrap();
        }
        dispatcher
            .invoke(&mut world, pebble, "moveTo", &[Value::Thing(box_id)])
            .unwrap();

        assert_eq!(
            world.thing(bag).unwrap().get("contents"),
            Some(&Value::List(vec![Value::Thing(marble)]))
        );
        assert_eq!(
            world.thing(box_id).unwrap().get("contents"),
            Some(&Value::List(vec![Value::Thing(pebble)]))
        );
        assert_eq!(
            world.thing(pebble).unwrap().get("location"),
            Some(&Value::Thing(box_id))
        );
    }

    #[test]
    fn move_to_ignores_destination_behaviors() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"name": "pebble", "behaviors": ["object"]}));
        let statue = spawn(&mut world, json!({"name": "statue", "behaviors": ["stone"]}));
        let crate_id = spawn(&mut world, json!({"contents": [], "behaviors": ["stone"]}));

        let result = dispatcher.invoke(&mut world, pebble, "moveTo", &[Value::Thing(statue)]);
        assert_eq!(result.unwrap(), Value::Null);
        assert!(!world.thing(pebble).unwrap().contains("location"));

        dispatcher
            .invoke(&mut world, pebble, "moveTo", &[Value::Thing(crate_id)])
            .unwrap();
        assert_eq!(
            world.thing(crate_id).unwrap().get("contents"),
            Some(&Value::List(vec![Value::Thing(pebble)]))
        );
    }

    #[test]
    fn move_to_without_destination_is_invalid_argument() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"behaviors": ["object"]}));

        let err = dispatcher.invoke(&mut world, pebble, "moveTo", &[]).unwrap_err();
        assert!(matches!(
            err,
            TabError::InvalidArgument { ref capability, .. } if capability == "moveTo"
        ));

        let err = dispatcher
            .invoke(&mut world, pebble, "moveTo", &[Value::from("box")])
            .unwrap_err();
        assert!(matches!(err, TabError::InvalidArgument { .. }));
    }

    #[test]
    fn move_to_unknown_destination_fails() {
        let registry = BehaviorRegistry::builtin();
        let dispatcher = Dispatcher::new(&registry);
        let mut world = World::new();
        let pebble = spawn(&mut world, json!({"behaviors": ["object"]}));
        assert!(matches!(
            dispatcher.invoke(&mut world, pebble, "moveTo", &[Value::Thing(ThingId::new())]),
            Err(TabError::ThingNotFound(_))
        ));
    }

    #[test]
    fn ball_bounces() {
        let registry = BehaviorRegistry::builtin();
        let mut world = World::new();
        let id = spawn(&mut world, json!({"behaviors": ["ball", "object"]}));
        let result = Dispatcher::new(&registry).invoke(&mut world, id, "bounce", &[]).unwrap();
        assert_eq!(result, Value::from("boing!"));
    }
}
