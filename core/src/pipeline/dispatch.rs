use super::batch::{Batch, FlushTrigger, Staged};
use super::cancel::send_or_cancel;
use super::flush::FlushTimer;
use crate::metrics::QueueStats;
use crossbeam::channel::{Receiver, Sender};
use crossbeam::select;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Assembly loop: on each do-work signal, drains the staging buffer up
/// to the next boundary and publishes the items as one [`Batch`].
///
/// Empty drains are not published. The flush timer is rearmed after
/// every handled signal, never while a batch is being assembled.
pub(crate) struct Assembler<'a, T> {
  pub staging: &'a Receiver<Staged<T>>,
  pub work: &'a Receiver<()>,
  pub output: &'a Sender<Batch<T>>,
  pub cancel: &'a Receiver<()>,
  pub timer: &'a FlushTimer,
  pub dispatched: &'a AtomicUsize,
  pub stats: &'a QueueStats,
}

impl<T> Assembler<'_, T> {
  /// Run until cancelled.
  pub fn run(self) {
    let mut sequence = 0u64;
    loop {
      select! {
        recv(self.work) -> signal => {
          if signal.is_err() {
            return;
          }
          let Some((items, trigger)) = self.drain() else { return };
          if items.is_empty() {
            debug!(%trigger, "boundary without items, nothing to publish");
            self.stats.record_empty_flush();
            self.timer.rearm();
            continue;
          }

          let count = items.len();
          sequence += 1;
          self.dispatched.fetch_add(count, Ordering::AcqRel);
          debug!(items = count, sequence, %trigger, "publishing batch");
          if !send_or_cancel(self.output, Batch::new(items, sequence, trigger), self.cancel) {
            return;
          }
          self.stats.record_published(count, trigger);
          self.timer.rearm();
        }
        recv(self.cancel) -> _ => return,
      }
    }
  }

  /// Collect items up to and excluding the next boundary.
  ///
  /// Returns `None` if cancelled first.
  fn drain(&self) -> Option<(Vec<T>, FlushTrigger)> {
    let mut items = Vec::new();
    loop {
      select! {
        recv(self.staging) -> staged => match staged {
          Ok(Staged::Item(item)) => items.push(item),
          Ok(Staged::Boundary(trigger)) => return Some((items, trigger)),
          Err(_) => return None,
        },
        recv(self.cancel) -> _ => return None,
      }
    }
  }
}
