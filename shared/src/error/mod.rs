pub mod types;

pub use types::BqueueError;

/// Shorthand Result type used throughout bqueue.
pub type Result<T> = std::result::Result<T, BqueueError>;
