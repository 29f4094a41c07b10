pub mod loader;

pub use loader::{
    BatchConfig, DEFAULT_INTERVAL, DEFAULT_MAX_BATCH_ITEMS, DEFAULT_MAX_QUEUE_SIZE,
};

use crate::error::{BqueueError, Result};
use std::path::Path;

/// Load a [`BatchConfig`] from a file with environment-variable overrides.
///
/// Resolution order:
/// 1. `path` — base configuration (format inferred from the extension)
/// 2. Environment variables with prefix `{env_prefix}_` (double underscore
///    for nesting)
///
/// Fields that are absent everywhere stay zero and are filled with
/// defaults when the queue is constructed.
///
/// # Example
///
/// `BQUEUE_MAX_BATCH_ITEMS=128` overrides `max_batch_items`.
pub fn load_config(path: &Path, env_prefix: &str) -> Result<BatchConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(BqueueError::ConfigLoadFailed)?;

    settings
        .try_deserialize()
        .map_err(BqueueError::ConfigLoadFailed)
}
