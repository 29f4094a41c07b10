use serde::Deserialize;
use std::time::Duration;

/// Flush interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
/// Count threshold used when none is configured.
pub const DEFAULT_MAX_BATCH_ITEMS: usize = 64;
/// Total buffering capacity used when none is configured.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 1024;

/// Tuning knobs for a batch queue.
///
/// Every field uses zero to mean "unset". Call [`BatchConfig::resolve`]
/// (the queue does this on construction) to fill unset fields with the
/// defaults. No other validation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Time-based flush period, measured from the previous flush.
    #[serde(rename = "interval_ms", deserialize_with = "millis::deserialize")]
    pub interval: Duration,
    /// Count-based flush threshold.
    pub max_batch_items: usize,
    /// Total buffering capacity across the pipeline.
    pub max_queue_size: usize,
}

impl BatchConfig {
    pub fn new(interval: Duration, max_batch_items: usize, max_queue_size: usize) -> Self {
        Self {
            interval,
            max_batch_items,
            max_queue_size,
        }
    }

    /// Resolve a possibly absent configuration into a fully populated one.
    pub fn resolve(config: Option<BatchConfig>) -> BatchConfig {
        let mut config = config.unwrap_or_default();
        config.ensure_defaults();
        config
    }

    /// Replace every zero field with its default.
    pub fn ensure_defaults(&mut self) {
        if self.interval.is_zero() {
            self.interval = DEFAULT_INTERVAL;
        }
        if self.max_batch_items == 0 {
            self.max_batch_items = DEFAULT_MAX_BATCH_ITEMS;
        }
        if self.max_queue_size == 0 {
            self.max_queue_size = DEFAULT_MAX_QUEUE_SIZE;
        }
    }

    /// Capacity of the buffer producers enqueue into.
    pub fn ingestion_capacity(&self) -> usize {
        self.max_queue_size / 2
    }

    /// Capacity of the buffer between ingestion and assembly.
    ///
    /// Never smaller than two full batches plus their boundaries, so a
    /// boundary can always be staged while the assembler is idle.
    pub fn staging_capacity(&self) -> usize {
        (self.max_queue_size / 2).max(2 * self.max_batch_items + 3)
    }

    /// Number of assembled batches that can wait for a consumer.
    pub fn output_capacity(&self) -> usize {
        self.max_queue_size / self.max_batch_items.max(1)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
