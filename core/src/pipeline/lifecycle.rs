use shared::{BqueueError, Result};
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::info;

/// Lifecycle of a batch queue: idle → running → stopped.
///
/// A queue runs at most once. Once stopped it cannot be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
  /// Constructed; items may be enqueued but nothing is dispatched.
  Idle,
  /// `start` is running the pipeline.
  Running,
  /// The pipeline has shut down, or stop was requested before it started.
  Stopped,
}

impl LifecycleState {
  fn from_u8(raw: u8) -> Self {
    match raw {
      0 => LifecycleState::Idle,
      1 => LifecycleState::Running,
      _ => LifecycleState::Stopped,
    }
  }

  fn as_u8(self) -> u8 {
    match self {
      LifecycleState::Idle => 0,
      LifecycleState::Running => 1,
      LifecycleState::Stopped => 2,
    }
  }
}

/// Thread-safe holder of the current [`LifecycleState`].
pub(crate) struct Lifecycle {
  state: AtomicU8,
}

impl Lifecycle {
  pub fn new() -> Self {
    Self {
      state: AtomicU8::new(LifecycleState::Idle.as_u8()),
    }
  }

  /// Move from `Idle` to `Running`, rejecting any other starting point.
  pub fn begin(&self) -> Result<()> {
    match self.state.compare_exchange(
      LifecycleState::Idle.as_u8(),
      LifecycleState::Running.as_u8(),
      Ordering::AcqRel,
      Ordering::Acquire,
    ) {
      Ok(_) => {
        info!(from = ?LifecycleState::Idle, to = ?LifecycleState::Running, "lifecycle state transition");
        Ok(())
      }
      Err(raw) => match LifecycleState::from_u8(raw) {
        LifecycleState::Running => Err(BqueueError::AlreadyStarted),
        _ => Err(BqueueError::Stopped),
      },
    }
  }

  /// Move from `Idle` straight to `Stopped`. No-op in any other state.
  pub fn retire_idle(&self) {
    if self
      .state
      .compare_exchange(
        LifecycleState::Idle.as_u8(),
        LifecycleState::Stopped.as_u8(),
        Ordering::AcqRel,
        Ordering::Acquire,
      )
      .is_ok()
    {
      info!(from = ?LifecycleState::Idle, to = ?LifecycleState::Stopped, "lifecycle state transition");
    }
  }

  /// Move to `Stopped` from any state.
  pub fn finish(&self) {
    let previous = LifecycleState::from_u8(
      self
        .state
        .swap(LifecycleState::Stopped.as_u8(), Ordering::AcqRel),
    );
    if previous != LifecycleState::Stopped {
      info!(from = ?previous, to = ?LifecycleState::Stopped, "lifecycle state transition");
    }
  }

  /// Current state.
  pub fn state(&self) -> LifecycleState {
    LifecycleState::from_u8(self.state.load(Ordering::Acquire))
  }
}
