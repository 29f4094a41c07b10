use super::batch::{FlushTrigger, Staged};
use super::cancel::send_or_cancel;
use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Resettable one-shot flush timer.
///
/// When armed and the interval elapses, the timer stages exactly one
/// interval boundary, raises exactly one do-work signal, and goes inert
/// until [`FlushTimer::rearm`] is called. The timer is armed once when
/// it starts running; afterwards only the assembler rearms it, after it
/// has finished handling a signal.
///
/// Each fire bumps a counter before the boundary is staged. The
/// ingestion loop watches it to restart its size window.
pub(crate) struct FlushTimer {
  interval: Duration,
  rearm_tx: Sender<()>,
  rearm_rx: Receiver<()>,
  fires: AtomicU64,
}

impl FlushTimer {
  pub fn new(interval: Duration) -> Self {
    // A pending rearm already restarts the window; extra requests collapse.
    let (rearm_tx, rearm_rx) = channel::bounded(1);
    Self {
      interval,
      rearm_tx,
      rearm_rx,
      fires: AtomicU64::new(0),
    }
  }

  /// Number of times the timer has fired.
  pub fn fires(&self) -> u64 {
    self.fires.load(Ordering::SeqCst)
  }

  /// Counted before staging, so any item staged after the boundary
  /// observes the new value.
  pub(crate) fn mark_fired(&self) {
    self.fires.fetch_add(1, Ordering::SeqCst);
  }

  /// Restart the interval window from now.
  pub fn rearm(&self) {
    let _ = self.rearm_tx.try_send(());
  }

  /// Run until cancelled. Stopping the timer is leaving this loop.
  pub fn run<T>(&self, staging: &Sender<Staged<T>>, work: &Sender<()>, cancel: &Receiver<()>) {
    let mut deadline = self.next_deadline();
    loop {
      let fire = match deadline {
        Some(at) => channel::at(at),
        None => channel::never(),
      };
      select! {
        recv(self.rearm_rx) -> msg => {
          if msg.is_ok() {
            deadline = self.next_deadline();
          }
        }
        recv(fire) -> _ => {
          deadline = None;
          debug!(interval_ms = self.interval.as_millis() as u64, "flush timer fired");
          self.mark_fired();
          let delivered = send_or_cancel(staging, Staged::Boundary(FlushTrigger::Interval), cancel)
            && send_or_cancel(work, (), cancel);
          if !delivered {
            break;
          }
        }
        recv(cancel) -> _ => break,
      }
    }
    debug!("flush timer stopped");
  }

  /// `None` when the interval is too large to represent; the timer then
  /// never fires on its own.
  fn next_deadline(&self) -> Option<Instant> {
    Instant::now().checked_add(self.interval)
  }
}
