use super::batch::{FlushTrigger, Staged};
use super::cancel::send_or_cancel;
use super::flush::FlushTimer;
use crossbeam::channel::{Receiver, Sender};
use crossbeam::select;
use tracing::trace;

/// Ingestion loop: moves enqueued items into the staging buffer and
/// closes a batch every `max_batch_items` items.
///
/// The count covers items forwarded since the last boundary of either
/// kind: a timer fire restarts the window. An item forwarded while the
/// timer is staging its boundary may be counted on the wrong side of
/// it, which can only shorten a batch, so no batch exceeds
/// `max_batch_items`.
pub(crate) struct Ingestor<'a, T> {
  pub input: &'a Receiver<T>,
  pub staging: &'a Sender<Staged<T>>,
  pub work: &'a Sender<()>,
  pub cancel: &'a Receiver<()>,
  pub timer: &'a FlushTimer,
  pub max_batch_items: usize,
}

impl<T> Ingestor<'_, T> {
  /// Run until cancelled.
  pub fn run(self) {
    let mut pending = 0usize;
    let mut seen_fires = self.timer.fires();
    loop {
      select! {
        recv(self.input) -> msg => {
          let Ok(item) = msg else { return };
          if !send_or_cancel(self.staging, Staged::Item(item), self.cancel) {
            return;
          }
          let fires = self.timer.fires();
          if fires != seen_fires {
            seen_fires = fires;
            pending = 0;
          }
          pending += 1;
          if pending == self.max_batch_items {
            pending = 0;
            trace!(items = self.max_batch_items, "size boundary reached");
            if !self.raise_boundary() {
              return;
            }
          }
        }
        recv(self.cancel) -> _ => return,
      }
    }
  }

  /// Stage a size boundary and hand the assembler a do-work signal.
  fn raise_boundary(&self) -> bool {
    send_or_cancel(
      self.staging,
      Staged::Boundary(FlushTrigger::Size),
      self.cancel,
    ) && send_or_cancel(self.work, (), self.cancel)
  }
}
