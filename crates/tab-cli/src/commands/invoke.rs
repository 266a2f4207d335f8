use std::path::Path;

use tab_core::{BehaviorRegistry, Dispatcher, Value, World};

pub fn run(
    root: &Path,
    sections: &[String],
    model: &str,
    addon: Option<&str>,
    capability: &str,
    args: &[String],
) -> Result<(), String> {
    let thing = super::make_thing(root, sections, model, addon)?;
    let args = args
        .iter()
        .map(|arg| {
            serde_json::from_str::<serde_json::Value>(arg)
                .map(Value::from)
                .map_err(|e| format!("invalid argument '{arg}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let registry = BehaviorRegistry::builtin();
    let dispatcher = Dispatcher::new(&registry);
    let mut world = World::new();
    let id = world.spawn(thing);

    let result = dispatcher
        .invoke(&mut world, id, capability, &args)
        .map_err(|e| e.to_string())?;
    println!("{result}");

    Ok(())
}
