pub mod batch;
pub(crate) mod cancel;
pub mod coordinator;
pub(crate) mod dispatch;
pub(crate) mod flush;
pub(crate) mod ingestion;
pub mod lifecycle;
pub mod listener;

pub use batch::{Batch, FlushTrigger};
pub use coordinator::{BatchQueue, BatchQueueBuilder};
pub use lifecycle::LifecycleState;
pub use listener::BatchCallback;
