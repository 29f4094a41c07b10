use thiserror::Error;

/// Top-level error type for the batch queue.
///
/// Backpressure never surfaces here: a full buffer blocks the caller.
/// Errors only report configuration problems and lifecycle misuse.
#[derive(Debug, Error)]
pub enum BqueueError {
    // ── Config ─────────────────────────────────────────────────
    #[error("config: failed to load configuration")]
    ConfigLoadFailed(#[source] config::ConfigError),

    // ── Lifecycle ──────────────────────────────────────────────
    #[error("lifecycle: queue is already running")]
    AlreadyStarted,

    #[error("lifecycle: queue has been stopped")]
    Stopped,

    #[error("lifecycle: failed to spawn worker thread '{name}'")]
    SpawnFailed {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}
