//! Handles to the background workers a component or connection spawned.

use tokio::task::JoinHandle;
use tracing::error;

/// The workers spawned by one `start` call (or several, after [`Workers::extend`]).
///
/// Dropping a `Workers` detaches the workers; they keep running until the cancellation
/// token fires or their sources close.
#[derive(Debug, Default)]
pub struct Workers {
  handles: Vec<JoinHandle<()>>,
}

impl Workers {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn push(&mut self, handle: JoinHandle<()>) {
    self.handles.push(handle);
  }

  /// Takes over the workers held by `other`.
  pub fn extend(&mut self, other: Workers) {
    self.handles.extend(other.handles);
  }

  pub fn len(&self) -> usize {
    self.handles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handles.is_empty()
  }

  /// True when every worker has exited.
  pub fn is_finished(&self) -> bool {
    self.handles.iter().all(JoinHandle::is_finished)
  }

  /// Aborts every worker without waiting for it.
  pub fn abort(&self) {
    for handle in &self.handles {
      handle.abort();
    }
  }

  /// Waits for every worker to exit. Returns how many of them panicked.
  pub async fn join(self) -> usize {
    let results = futures::future::join_all(self.handles).await;
    let mut panicked = 0;
    for result in results {
      if let Err(e) = result
        && e.is_panic()
      {
        error!(error = %e, "worker panicked");
        panicked += 1;
      }
    }
    panicked
  }
}

