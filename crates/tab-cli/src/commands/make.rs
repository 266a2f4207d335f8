use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tab_core::Value;

pub fn run(
    root: &Path,
    sections: &[String],
    model: &str,
    addon: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let thing = super::make_thing(root, sections, model, addon)?;

    if json {
        let attrs = Value::Map(thing.attributes().clone()).to_json();
        let text = serde_json::to_string_pretty(&attrs).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    let title = thing.name().unwrap_or("thing");
    println!("  {} [{}]", title.bold(), thing.id().to_string().dimmed());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Attribute", "Value"]);
    for (key, value) in thing.attributes() {
        table.add_row(vec![key.clone(), value.to_string()]);
    }
    println!("{table}");

    Ok(())
}
