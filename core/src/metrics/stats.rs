use crate::pipeline::FlushTrigger;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-queue pipeline counters.
///
/// Counters are monotonic for the lifetime of the queue, unlike the
/// dispatched count exposed by the queue itself, which resets on stop.
#[derive(Debug, Default)]
pub struct QueueStats {
  // Ingestion
  items_enqueued: AtomicU64,
  // Assembly
  items_dispatched: AtomicU64,
  batches_published: AtomicU64,
  size_flushes: AtomicU64,
  interval_flushes: AtomicU64,
  empty_flushes: AtomicU64,
}

/// Point-in-time copy of [`QueueStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
  /// Items accepted by `enqueue`.
  pub items_enqueued: u64,
  /// Items published in batches.
  pub items_dispatched: u64,
  /// Batches published.
  pub batches_published: u64,
  /// Published batches closed by the size threshold.
  pub size_flushes: u64,
  /// Published batches closed by the flush interval.
  pub interval_flushes: u64,
  /// Boundaries that found no items to publish.
  pub empty_flushes: u64,
}

impl QueueStats {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn record_enqueued(&self) {
    self.items_enqueued.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn record_published(&self, items: usize, trigger: FlushTrigger) {
    self
      .items_dispatched
      .fetch_add(items as u64, Ordering::Relaxed);
    self.batches_published.fetch_add(1, Ordering::Relaxed);
    match trigger {
      FlushTrigger::Size => self.size_flushes.fetch_add(1, Ordering::Relaxed),
      FlushTrigger::Interval => {
        self.interval_flushes.fetch_add(1, Ordering::Relaxed)
      }
    };
  }

  pub(crate) fn record_empty_flush(&self) {
    self.empty_flushes.fetch_add(1, Ordering::Relaxed);
  }

  pub fn snapshot(&self) -> StatsSnapshot {
    StatsSnapshot {
      items_enqueued: self.items_enqueued.load(Ordering::Relaxed),
      items_dispatched: self.items_dispatched.load(Ordering::Relaxed),
      batches_published: self.batches_published.load(Ordering::Relaxed),
      size_flushes: self.size_flushes.load(Ordering::Relaxed),
      interval_flushes: self.interval_flushes.load(Ordering::Relaxed),
      empty_flushes: self.empty_flushes.load(Ordering::Relaxed),
    }
  }
}
