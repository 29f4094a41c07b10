use super::batch::Batch;
use crossbeam::channel::Receiver;
use crossbeam::select;

/// Consumer callback invoked once per published batch.
pub type BatchCallback<T> = Box<dyn Fn(Batch<T>) + Send + Sync + 'static>;

/// Delivers published batches to the configured callback, in order.
///
/// The callback runs on the listener thread. A slow callback fills the
/// output buffer, which in turn blocks the assembler and eventually the
/// producers.
pub(crate) fn listen<T>(output: &Receiver<Batch<T>>, callback: &BatchCallback<T>, cancel: &Receiver<()>) {
  loop {
    select! {
      recv(output) -> batch => match batch {
        Ok(batch) => callback(batch),
        Err(_) => return,
      },
      recv(cancel) -> _ => return,
    }
  }
}
