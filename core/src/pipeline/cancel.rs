use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Cooperative cancellation shared by every loop of one queue.
///
/// Cancelling drops the only sender of the watch channel. Every blocking
/// wait selects on [`CancelSignal::watch`], which becomes ready (with a
/// disconnect) as soon as the signal fires.
pub(crate) struct CancelSignal {
  cancelled: AtomicBool,
  trigger: Mutex<Option<Sender<()>>>,
  watch: Receiver<()>,
}

impl CancelSignal {
  pub fn new() -> Self {
    let (trigger, watch) = channel::bounded(0);
    Self {
      cancelled: AtomicBool::new(false),
      trigger: Mutex::new(Some(trigger)),
      watch,
    }
  }

  /// Fire the signal. Returns `true` only for the call that fired it.
  pub fn cancel(&self) -> bool {
    if self.cancelled.swap(true, Ordering::AcqRel) {
      return false;
    }
    self
      .trigger
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
    true
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }

  /// Receiver that becomes ready once the signal has fired.
  pub fn watch(&self) -> &Receiver<()> {
    &self.watch
  }
}

/// Blocking send that gives up when `cancel` fires.
///
/// Returns `false` if the message was not delivered.
pub(crate) fn send_or_cancel<M>(tx: &Sender<M>, msg: M, cancel: &Receiver<()>) -> bool {
  select! {
    send(tx, msg) -> res => res.is_ok(),
    recv(cancel) -> _ => false,
  }
}
