// ABOUTME: Embedded WAAPI seed catalog and the process-wide registry
// ABOUTME: Parsed on first access; integrity errors are fatal at startup

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::catalog::descriptor::{FunctionDescriptor, TopicDescriptor};
use crate::catalog::registry::Registry;
use crate::error::Error;

/// Seed document compiled into the crate
pub const SEED_JSON: &str = include_str!("../../catalog/waapi.json");

static GLOBAL: OnceCell<Arc<Registry>> = OnceCell::new();

#[derive(Debug, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    functions: Vec<FunctionDescriptor>,
    #[serde(default)]
    topics: Vec<TopicDescriptor>,
}

/// Build a registry from a seed document in the embedded JSON layout
pub fn from_json(json: &str) -> Result<Registry, Error> {
    let document: SeedDocument =
        serde_json::from_str(json).map_err(|e| Error::Seed(e.to_string()))?;

    let mut builder = Registry::builder();
    for function in document.functions {
        builder.register(function)?;
    }
    for topic in document.topics {
        builder.register(topic)?;
    }
    builder.build()
}

/// Build a fresh registry from the embedded seed
pub fn load() -> Result<Registry, Error> {
    from_json(SEED_JSON)
}

/// Process-wide registry built from the embedded seed
///
/// Initialised once on first access and never torn down.
pub fn global() -> Result<Arc<Registry>, Error> {
    GLOBAL
        .get_or_try_init(|| {
            let registry = load()?;
            log::info!(
                "Loaded WAAPI catalog: {} functions, {} topics",
                registry.functions().count(),
                registry.topics().count()
            );
            Ok(Arc::new(registry))
        })
        .cloned()
}
