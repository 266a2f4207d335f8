use std::path::Path;

use colored::Colorize;

pub fn run(root: &Path, sections: &[String]) -> Result<(), String> {
    let store = super::open_catalog(root, sections)?;
    let names = store.model_names().map_err(|e| e.to_string())?;

    println!("  {} {}", "Sections:".dimmed(), store.sections().join(", "));
    println!();

    if names.is_empty() {
        println!("  No models found.");
        return Ok(());
    }

    for name in &names {
        println!("  {name}");
    }
    println!();
    println!("  {} models", names.len());

    Ok(())
}
