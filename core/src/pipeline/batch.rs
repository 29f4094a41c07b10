use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Which boundary condition closed a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushTrigger {
  /// `max_batch_items` items were forwarded since the last size boundary.
  Size,
  /// The flush interval elapsed since the previous flush.
  Interval,
}

impl fmt::Display for FlushTrigger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FlushTrigger::Size => write!(f, "size"),
      FlushTrigger::Interval => write!(f, "interval"),
    }
  }
}

/// An entry in the staging buffer.
///
/// Boundaries travel in-band with items, so a producer can never enqueue
/// a value that is mistaken for the end of a batch.
#[derive(Debug)]
pub(crate) enum Staged<T> {
  Item(T),
  Boundary(FlushTrigger),
}

/// An ordered group of items released together to a consumer.
///
/// Items keep the order in which they reached the staging buffer.
/// Receiving a batch transfers ownership of its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
  items: Vec<T>,
  sequence: u64,
  trigger: FlushTrigger,
}

impl<T> Batch<T> {
  pub(crate) fn new(items: Vec<T>, sequence: u64, trigger: FlushTrigger) -> Self {
    Self {
      items,
      sequence,
      trigger,
    }
  }

  /// Returns the items in this batch.
  pub fn items(&self) -> &[T] {
    &self.items
  }

  /// Consume the batch, returning the items.
  pub fn into_items(self) -> Vec<T> {
    self.items
  }

  /// Publication order of this batch, starting at 1.
  pub fn sequence(&self) -> u64 {
    self.sequence
  }

  /// The boundary that closed this batch.
  pub fn trigger(&self) -> FlushTrigger {
    self.trigger
  }
}

impl<T> Deref for Batch<T> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    &self.items
  }
}

impl<T> IntoIterator for Batch<T> {
  type Item = T;
  type IntoIter = std::vec::IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.into_iter()
  }
}

impl<'a, T> IntoIterator for &'a Batch<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}
