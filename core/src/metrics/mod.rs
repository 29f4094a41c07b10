pub mod stats;

pub use stats::{QueueStats, StatsSnapshot};
