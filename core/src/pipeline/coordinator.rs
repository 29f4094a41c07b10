use super::batch::{Batch, Staged};
use super::cancel::{send_or_cancel, CancelSignal};
use super::dispatch::Assembler;
use super::flush::FlushTimer;
use super::ingestion::Ingestor;
use super::lifecycle::{Lifecycle, LifecycleState};
use super::listener::{listen, BatchCallback};
use crate::metrics::{QueueStats, StatsSnapshot};
use crossbeam::channel::{self, Receiver, Sender};
use shared::config::BatchConfig;
use shared::{BqueueError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, Scope};
use std::time::Duration;
use tracing::info;

/// Groups individually enqueued items into ordered batches.
///
/// A batch is released when `max_batch_items` items have been forwarded
/// or when `interval` has elapsed since the previous flush, whichever
/// comes first. Pipeline: `enqueue` → ingestion buffer → ingestion loop
/// → staging buffer (items + boundaries) → assembler → output buffer →
/// listener callback or [`BatchQueue::batches`].
///
/// Every queue owns its buffers, timer and counters; instances share
/// nothing. Run [`BatchQueue::start`] on a dedicated thread and share the
/// queue with producers through an `Arc`.
pub struct BatchQueue<T> {
  config: BatchConfig,
  ingest_tx: Sender<T>,
  ingest_rx: Receiver<T>,
  staging_tx: Sender<Staged<T>>,
  staging_rx: Receiver<Staged<T>>,
  /// Rendezvous channel: raising a signal blocks until the assembler takes it.
  work_tx: Sender<()>,
  work_rx: Receiver<()>,
  output_tx: Sender<Batch<T>>,
  output_rx: Receiver<Batch<T>>,
  timer: FlushTimer,
  on_batch: Option<BatchCallback<T>>,
  cancel: CancelSignal,
  lifecycle: Lifecycle,
  /// Items published since start. Written by the assembler only.
  dispatched: AtomicUsize,
  stats: QueueStats,
}

/// Builder for configuring a [`BatchQueue`].
pub struct BatchQueueBuilder<T> {
  config: BatchConfig,
  on_batch: Option<BatchCallback<T>>,
}

impl<T> BatchQueue<T> {
  /// Create a queue. `None` or zero fields fall back to the defaults.
  pub fn new(config: Option<BatchConfig>) -> Self {
    Self::from_parts(config, None)
  }

  /// Create a builder for a fully configured queue.
  pub fn builder() -> BatchQueueBuilder<T> {
    BatchQueueBuilder {
      config: BatchConfig::default(),
      on_batch: None,
    }
  }

  fn from_parts(config: Option<BatchConfig>, on_batch: Option<BatchCallback<T>>) -> Self {
    let config = BatchConfig::resolve(config);
    let (ingest_tx, ingest_rx) = channel::bounded(config.ingestion_capacity());
    let (staging_tx, staging_rx) = channel::bounded(config.staging_capacity());
    let (work_tx, work_rx) = channel::bounded(0);
    let (output_tx, output_rx) = channel::bounded(config.output_capacity());

    Self {
      timer: FlushTimer::new(config.interval),
      config,
      ingest_tx,
      ingest_rx,
      staging_tx,
      staging_rx,
      work_tx,
      work_rx,
      output_tx,
      output_rx,
      on_batch,
      cancel: CancelSignal::new(),
      lifecycle: Lifecycle::new(),
      dispatched: AtomicUsize::new(0),
      stats: QueueStats::new(),
    }
  }

  /// Submit an item.
  ///
  /// Blocks while the ingestion buffer is full; this is the only
  /// backpressure producers see. Items enqueued before `start` are
  /// buffered. After `stop` (including while blocked) the item is
  /// dropped and `Err(Stopped)` is returned.
  pub fn enqueue(&self, item: T) -> Result<()> {
    if self.cancel.is_cancelled() {
      return Err(BqueueError::Stopped);
    }
    if !send_or_cancel(&self.ingest_tx, item, self.cancel.watch()) {
      return Err(BqueueError::Stopped);
    }
    self.stats.record_enqueued();
    Ok(())
  }

  /// Request a graceful shutdown and return immediately.
  ///
  /// Every loop exits at its next blocking point. Staged items that
  /// were not yet published are discarded. `start` returns once all
  /// loops have exited, after resetting the dispatched count.
  pub fn stop(&self) {
    if self.cancel.cancel() {
      info!(state = ?self.lifecycle.state(), "batch queue stop requested");
    }
    self.lifecycle.retire_idle();
  }

  /// The output buffer, for callers that consume batches directly.
  ///
  /// Receivers are cloneable; each batch goes to exactly one receiver.
  /// When a callback is configured the listener competes for batches
  /// with any receiver taken here.
  pub fn batches(&self) -> Receiver<Batch<T>> {
    self.output_rx.clone()
  }

  /// Total items published since start. Resets to zero once stopped.
  pub fn dispatched_count(&self) -> usize {
    self.dispatched.load(Ordering::Acquire)
  }

  pub fn stats(&self) -> StatsSnapshot {
    self.stats.snapshot()
  }

  pub fn state(&self) -> LifecycleState {
    self.lifecycle.state()
  }

  /// The resolved configuration.
  pub fn config(&self) -> &BatchConfig {
    &self.config
  }
}

impl<T: Send> BatchQueue<T> {
  /// Run the pipeline on the calling thread until [`BatchQueue::stop`].
  ///
  /// The calling thread becomes the ingestion loop; the flush timer, the
  /// assembler and the optional listener get their own threads, all of
  /// which are joined before this returns. A queue can be started once.
  pub fn start(&self) -> Result<()> {
    self.lifecycle.begin()?;
    info!(
      interval_ms = self.config.interval.as_millis() as u64,
      max_batch_items = self.config.max_batch_items,
      max_queue_size = self.config.max_queue_size,
      callback = self.on_batch.is_some(),
      "batch queue starting"
    );

    let result = thread::scope(|scope| -> Result<()> {
      self.spawn_workers(scope)?;
      Ingestor {
        input: &self.ingest_rx,
        staging: &self.staging_tx,
        work: &self.work_tx,
        cancel: self.cancel.watch(),
        timer: &self.timer,
        max_batch_items: self.config.max_batch_items,
      }
      .run();
      Ok(())
    });

    self.dispatched.store(0, Ordering::Release);
    self.lifecycle.finish();
    info!(stats = ?self.stats.snapshot(), "batch queue stopped");
    result
  }

  fn spawn_workers<'scope, 'env>(&'env self, scope: &'scope Scope<'scope, 'env>) -> Result<()> {
    self.spawn_worker(scope, "bqueue-flush-timer", move || {
      self
        .timer
        .run(&self.staging_tx, &self.work_tx, self.cancel.watch())
    })?;

    self.spawn_worker(scope, "bqueue-assembler", move || {
      Assembler {
        staging: &self.staging_rx,
        work: &self.work_rx,
        output: &self.output_tx,
        cancel: self.cancel.watch(),
        timer: &self.timer,
        dispatched: &self.dispatched,
        stats: &self.stats,
      }
      .run()
    })?;

    if let Some(callback) = &self.on_batch {
      self.spawn_worker(scope, "bqueue-listener", move || {
        listen(&self.output_rx, callback, self.cancel.watch())
      })?;
    }
    Ok(())
  }

  /// Spawn a scoped worker. On failure the queue is cancelled so that
  /// workers already running exit and the scope can close.
  fn spawn_worker<'scope, 'env, F>(
    &'env self,
    scope: &'scope Scope<'scope, 'env>,
    name: &'static str,
    f: F,
  ) -> Result<()>
  where
    F: FnOnce() + Send + 'scope,
  {
    thread::Builder::new()
      .name(name.to_string())
      .spawn_scoped(scope, f)
      .map(|_| ())
      .map_err(|source| {
        self.cancel.cancel();
        BqueueError::SpawnFailed { name, source }
      })
  }
}

impl<T> BatchQueueBuilder<T> {
  /// Start from an existing configuration.
  pub fn config(mut self, config: BatchConfig) -> Self {
    self.config = config;
    self
  }

  /// Set the flush interval.
  pub fn interval(mut self, interval: Duration) -> Self {
    self.config.interval = interval;
    self
  }

  /// Set the count threshold.
  pub fn max_batch_items(mut self, max_batch_items: usize) -> Self {
    self.config.max_batch_items = max_batch_items;
    self
  }

  /// Set the total buffering capacity.
  pub fn max_queue_size(mut self, max_queue_size: usize) -> Self {
    self.config.max_queue_size = max_queue_size;
    self
  }

  /// Deliver every batch to `callback` on a dedicated listener thread.
  pub fn on_batch<F>(mut self, callback: F) -> Self
  where
    F: Fn(Batch<T>) + Send + Sync + 'static,
  {
    self.on_batch = Some(Box::new(callback));
    self
  }

  pub fn build(self) -> BatchQueue<T> {
    BatchQueue::from_parts(Some(self.config), self.on_batch)
  }
}
