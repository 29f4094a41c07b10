#![cfg(test)]
use crate::support::{spawn, wait_until};
use bqueue_core::{Batch, BatchQueue};
use crossbeam::channel;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn callback_receives_every_item() -> anyhow::Result<()> {
  const PRODUCERS: usize = 3;
  const ITEMS: usize = 103;

  let seen = Arc::new(Mutex::new(Vec::new()));
  let sizes = Arc::new(Mutex::new(Vec::new()));
  let queue = {
    let seen = Arc::clone(&seen);
    let sizes = Arc::clone(&sizes);
    Arc::new(
      BatchQueue::builder()
        .interval(Duration::from_millis(50))
        .max_batch_items(50)
        .on_batch(move |batch: Batch<String>| {
          sizes.lock().unwrap().push(batch.len());
          seen.lock().unwrap().extend(batch);
        })
        .build(),
    )
  };
  let runner = spawn(&queue);

  let producers: Vec<_> = (0..PRODUCERS)
    .map(|p| {
      let queue = Arc::clone(&queue);
      thread::spawn(move || {
        for i in 0..ITEMS {
          queue.enqueue(format!("producer#{p} item#{i}")).unwrap();
        }
      })
    })
    .collect();
  for producer in producers {
    producer.join().unwrap();
  }

  assert!(wait_until(|| seen.lock().unwrap().len() == PRODUCERS * ITEMS));
  assert!(sizes.lock().unwrap().iter().all(|&n| n > 0 && n <= 50));
  assert_eq!(queue.dispatched_count(), PRODUCERS * ITEMS);

  queue.stop();
  runner.join().unwrap()?;
  Ok(())
}

#[test]
fn slow_callback_backpressures_producers() -> anyhow::Result<()> {
  const TOTAL: usize = 100;

  let (gate_tx, gate_rx) = channel::bounded::<()>(0);
  let delivered = Arc::new(Mutex::new(0usize));
  let queue = {
    let delivered = Arc::clone(&delivered);
    Arc::new(
      BatchQueue::builder()
        .interval(Duration::from_secs(30))
        .max_batch_items(2)
        .max_queue_size(8)
        .on_batch(move |batch: Batch<usize>| {
          // Blocks until the gate sender is dropped.
          let _ = gate_rx.recv();
          *delivered.lock().unwrap() += batch.len();
        })
        .build(),
    )
  };
  let runner = spawn(&queue);

  let producer = {
    let queue = Arc::clone(&queue);
    thread::spawn(move || {
      for i in 0..TOTAL {
        queue.enqueue(i).unwrap();
      }
    })
  };

  thread::sleep(Duration::from_millis(200));
  let enqueued = queue.stats().items_enqueued as usize;
  assert!(enqueued < TOTAL, "producer was never blocked ({enqueued} enqueued)");

  drop(gate_tx);
  producer.join().unwrap();
  assert!(wait_until(|| *delivered.lock().unwrap() == TOTAL));

  queue.stop();
  runner.join().unwrap()?;
  Ok(())
}
