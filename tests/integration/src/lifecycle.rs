#![cfg(test)]
use crate::support::spawn;
use bqueue_core::{BatchQueue, BqueueError, LifecycleState};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn second_start_is_rejected() -> anyhow::Result<()> {
  let queue: Arc<BatchQueue<u8>> = Arc::new(BatchQueue::new(None));
  let runner = spawn(&queue);

  assert!(matches!(queue.start(), Err(BqueueError::AlreadyStarted)));
  assert_eq!(queue.state(), LifecycleState::Running);

  queue.stop();
  runner.join().unwrap()?;
  assert_eq!(queue.state(), LifecycleState::Stopped);
  Ok(())
}

#[test]
fn stop_discards_staged_items_and_resets_count() -> anyhow::Result<()> {
  let queue = Arc::new(
    BatchQueue::builder()
      .interval(Duration::from_secs(30))
      .max_batch_items(4)
      .build(),
  );
  let batches = queue.batches();
  let runner = spawn(&queue);

  for i in 0..6 {
    queue.enqueue(i)?;
  }
  assert_eq!(batches.recv_timeout(crate::support::WAIT)?.into_items(), vec![0, 1, 2, 3]);
  assert_eq!(queue.dispatched_count(), 4);

  queue.stop();
  runner.join().unwrap()?;

  assert_eq!(queue.dispatched_count(), 0);
  assert!(batches.recv_timeout(Duration::from_millis(100)).is_err());
  assert!(matches!(queue.enqueue(99), Err(BqueueError::Stopped)));
  Ok(())
}

#[test]
fn stop_wakes_a_blocked_producer() {
  // Ingestion capacity is 2 and the queue is never started.
  let queue = Arc::new(BatchQueue::builder().max_queue_size(4).build());
  queue.enqueue(1).unwrap();
  queue.enqueue(2).unwrap();

  let producer = {
    let queue = Arc::clone(&queue);
    thread::spawn(move || queue.enqueue(3))
  };
  thread::sleep(Duration::from_millis(50));
  assert!(!producer.is_finished());

  queue.stop();
  assert!(matches!(producer.join().unwrap(), Err(BqueueError::Stopped)));
  assert_eq!(queue.stats().items_enqueued, 2);
}
