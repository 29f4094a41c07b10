pub mod metrics;
pub mod pipeline;

pub use metrics::StatsSnapshot;
pub use pipeline::{Batch, BatchCallback, BatchQueue, BatchQueueBuilder, FlushTrigger, LifecycleState};
pub use shared::config::BatchConfig;
pub use shared::{BqueueError, Result};
