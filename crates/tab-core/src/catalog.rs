//! Model store backed by a catalog directory of JSON files.
//!
//! A catalog root holds one subdirectory per section, each containing
//! `<model>.json` files:
//!
//! ```text
//! catalog/
//!   tab/thing.json
//!   vr/object.json
//!   vr/container.json
//! ```
//!
//! Only active sections are searched, in activation order; the first
//! section that defines a model wins. Parsed models are cached by name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TabError, TabResult};
use crate::model::ModelStore;
use crate::ordered_set::OrderedSet;
use crate::value::{Attributes, attributes_from_json};

/// Extension of model files.
pub const MODEL_EXTENSION: &str = "json";

/// Configuration for a catalog model store.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Sections active from the start, in search order.
    pub sections: OrderedSet<String>,
    /// Whether parsed models are kept in memory between lookups.
    pub cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sections: std::iter::once("tab".to_string()).collect(),
            cache: true,
        }
    }
}

impl CatalogConfig {
    /// Append a section to the default search order.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.sections.insert(section.into());
        self
    }

    /// Enable or disable the model cache.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

/// A [`ModelStore`] reading `<root>/<section>/<name>.json`.
#[derive(Debug)]
pub struct CatalogModelStore {
    root: PathBuf,
    config: CatalogConfig,
    cache: RefCell<HashMap<String, Attributes>>,
}

impl CatalogModelStore {
    /// Open a catalog with the default configuration.
    pub fn open(root: impl Into<PathBuf>) -> TabResult<Self> {
        Self::with_config(root, CatalogConfig::default())
    }

    /// Open a catalog with a custom configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: CatalogConfig) -> TabResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(TabError::Catalog {
                path: root,
                message: "not a directory".to_string(),
            });
        }
        Ok(Self {
            root,
            config,
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// The catalog root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active sections in search order.
    pub fn sections(&self) -> &[String] {
        self.config.sections.as_slice()
    }

    /// Activate another section. It is searched after those already active.
    ///
    /// Clears the cache, since a newly active section can supply models
    /// that were previously missing.
    pub fn activate(&mut self, section: impl Into<String>) {
        if self.config.sections.insert(section.into()) {
            self.cache.borrow_mut().clear();
        }
    }

    /// Sorted, de-duplicated names of all models in active sections.
    pub fn model_names(&self) -> TabResult<Vec<String>> {
        let mut names = Vec::new();
        for section in self.config.sections.iter() {
            let dir = self.root.join(section);
            if !dir.is_dir() {
                continue;
            }
            let entries = fs::read_dir(&dir).map_err(|e| TabError::Catalog {
                path: dir.clone(),
                message: e.to_string(),
            })?;
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == MODEL_EXTENSION) {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Model names map to a single file inside a section directory, so
    /// anything that could address another path is refused.
    fn check_name(name: &str) -> TabResult<()> {
        let escapes = name.is_empty()
            || name.contains(['/', '\\'])
            || name.contains("..")
            || Path::new(name).is_absolute();
        if escapes {
            return Err(TabError::InvalidModelInput(format!(
                "model name {name:?} is not a plain file name"
            )));
        }
        Ok(())
    }

    fn find_file(&self, name: &str) -> Option<PathBuf> {
        self.config
            .sections
            .iter()
            .map(|section| {
                self.root
                    .join(section)
                    .join(format!("{name}.{MODEL_EXTENSION}"))
            })
            .find(|path| path.is_file())
    }

    fn read_model(path: &Path) -> TabResult<Attributes> {
        let catalog_error = |message: String| TabError::Catalog {
            path: path.to_path_buf(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| catalog_error(e.to_string()))?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| catalog_error(e.to_string()))?;
        attributes_from_json(json).map_err(|e| catalog_error(e.to_string()))
    }
}

impl ModelStore for CatalogModelStore {
    fn lookup(&self, name: &str) -> TabResult<Option<Attributes>> {
        if let Some(cached) = self.cache.borrow().get(name) {
            return Ok(Some(cached.clone()));
        }
        Self::check_name(name)?;
        let Some(path) = self.find_file(name) else {
            return Ok(None);
        };

        let attrs = Self::read_model(&path).inspect_err(|e| {
            tracing::warn!(model = name, error = %e, "failed to load catalog model");
        })?;
        tracing::debug!(model = name, path = %path.display(), "loaded catalog model");

        if self.config.cache {
            self.cache.borrow_mut().insert(name.to_string(), attrs.clone());
        }
        Ok(Some(attrs))
    }
}
