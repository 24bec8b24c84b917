//! Bounded, closable FIFO of information packages.
//!
//! A [`Queue`] is a cheap-to-clone handle over a tokio mpsc channel. Every clone may send and
//! receive; receivers take turns on the shared end. Sending waits while the queue is full,
//! which is what carries backpressure upstream.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use futures::Stream;
use tokio::sync::mpsc;

use crate::error::{GraphError, QueueClosed};
use crate::types::InformationPackage;

/// Capacity of [`Queue::default`].
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
  Some(capacity) => capacity,
  None => panic!("default capacity must be non-zero"),
};

struct Inner {
  capacity: usize,
  /// `None` once the queue is closed.
  sender: Mutex<Option<mpsc::Sender<InformationPackage>>>,
  receiver: tokio::sync::Mutex<mpsc::Receiver<InformationPackage>>,
}

/// Shared handle to one bounded queue.
#[derive(Clone)]
pub struct Queue {
  inner: Arc<Inner>,
}

impl Queue {
  /// Creates a queue holding at most `capacity` packages.
  pub fn bounded(capacity: usize) -> Result<Self, GraphError> {
    let capacity =
      NonZeroUsize::new(capacity).ok_or(GraphError::InvalidCapacity { capacity })?;
    Ok(Self::with_capacity(capacity))
  }

  fn with_capacity(capacity: NonZeroUsize) -> Self {
    let (tx, rx) = mpsc::channel(capacity.get());
    Self {
      inner: Arc::new(Inner {
        capacity: capacity.get(),
        sender: Mutex::new(Some(tx)),
        receiver: tokio::sync::Mutex::new(rx),
      }),
    }
  }

  fn live_sender(&self) -> Option<mpsc::Sender<InformationPackage>> {
    self
      .inner
      .sender
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Appends `package`, waiting while the queue is full.
  ///
  /// Fails with the package handed back once the queue has been closed.
  pub async fn send(&self, package: InformationPackage) -> Result<(), QueueClosed> {
    let Some(tx) = self.live_sender() else {
      return Err(QueueClosed(package));
    };
    tx.send(package).await.map_err(|e| QueueClosed(e.0))
  }

  /// Takes the next package, waiting while the queue is empty.
  ///
  /// Returns `None` only when the queue is closed and drained. Cancel safe.
  pub async fn recv(&self) -> Option<InformationPackage> {
    self.inner.receiver.lock().await.recv().await
  }

  /// Takes the next package if one is ready and no other receiver is waiting.
  pub fn try_recv(&self) -> Option<InformationPackage> {
    self.inner.receiver.try_lock().ok()?.try_recv().ok()
  }

  /// Closes the queue. Packages already queued can still be received.
  ///
  /// A send that is already waiting for space completes once space frees up.
  pub fn close(&self) {
    self
      .inner
      .sender
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
  }

  pub fn is_closed(&self) -> bool {
    self
      .inner
      .sender
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .is_none()
  }

  pub fn capacity(&self) -> usize {
    self.inner.capacity
  }

  /// Number of packages currently queued.
  pub fn len(&self) -> usize {
    match self.live_sender() {
      Some(tx) => tx.max_capacity() - tx.capacity(),
      None => self
        .inner
        .receiver
        .try_lock()
        .map(|rx| rx.len())
        .unwrap_or(0),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Turns the queue into a stream that ends when the queue is closed and drained.
  pub fn into_stream(self) -> impl Stream<Item = InformationPackage> + Send + 'static {
    async_stream::stream! {
      while let Some(package) = self.recv().await {
        yield package;
      }
    }
  }
}

impl Default for Queue {
  fn default() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }
}

impl fmt::Debug for Queue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Queue")
      .field("capacity", &self.capacity())
      .field("len", &self.len())
      .field("closed", &self.is_closed())
      .finish()
  }
}
