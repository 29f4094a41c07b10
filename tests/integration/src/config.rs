#![cfg(test)]
use bqueue_core::BatchQueue;
use shared::config::{load_config, DEFAULT_MAX_QUEUE_SIZE};
use std::io::Write;
use std::time::Duration;

#[test]
fn queue_from_config_file() -> anyhow::Result<()> {
  let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
  writeln!(file, "interval_ms = 1500")?;
  writeln!(file, "max_batch_items = 32")?;

  let cfg = load_config(file.path(), "BQUEUE_INTEGRATION")?;
  let queue: BatchQueue<u32> = BatchQueue::builder().config(cfg).build();

  assert_eq!(queue.config().interval, Duration::from_millis(1500));
  assert_eq!(queue.config().max_batch_items, 32);
  assert_eq!(queue.config().max_queue_size, DEFAULT_MAX_QUEUE_SIZE);
  Ok(())
}
