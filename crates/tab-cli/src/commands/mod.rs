pub mod invoke;
pub mod make;
pub mod models;

use std::path::Path;

use tab_core::{CatalogConfig, CatalogModelStore, ModelRef, Thing, ThingBuilder};

/// Open the catalog at `root` with the default section plus `sections`.
fn open_catalog(root: &Path, sections: &[String]) -> Result<CatalogModelStore, String> {
    let config = sections
        .iter()
        .fold(CatalogConfig::default(), |config, section| {
            config.with_section(section.clone())
        });
    CatalogModelStore::with_config(root, config).map_err(|e| e.to_string())
}

/// A model argument is inline JSON when it starts with `{`, else a name.
fn parse_model(arg: &str) -> Result<ModelRef, String> {
    if arg.trim_start().starts_with('{') {
        let json: serde_json::Value =
            serde_json::from_str(arg).map_err(|e| format!("invalid inline model: {e}"))?;
        ModelRef::from_json(json).map_err(|e| e.to_string())
    } else {
        Ok(ModelRef::named(arg))
    }
}

/// Build one thing from command-line model arguments.
fn make_thing(
    root: &Path,
    sections: &[String],
    model: &str,
    addon: Option<&str>,
) -> Result<Thing, String> {
    let store = open_catalog(root, sections)?;
    tracing::debug!(root = %root.display(), sections = ?store.sections(), model, "making thing");
    let base = parse_model(model)?;
    let addon = addon.map(parse_model).transpose()?;
    ThingBuilder::new(&store)
        .build(Some(&base), addon.as_ref())
        .map_err(|e| e.to_string())
}
