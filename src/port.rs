//! Named pair of bounded queues.

use crate::error::GraphError;
use crate::queue::Queue;

/// A named `(input, output)` pair of queues.
///
/// Producers and upstream connections send into `input`; the component bound to the port
/// publishes into `output`, where downstream connections pick packages up. The caller owns
/// both queues and is responsible for closing them on shutdown.
#[derive(Debug, Clone)]
pub struct Port {
  pub id: String,
  pub input: Queue,
  pub output: Queue,
}

impl Port {
  pub fn new(id: impl Into<String>, input: Queue, output: Queue) -> Self {
    Self {
      id: id.into(),
      input,
      output,
    }
  }

  /// Creates a port whose two queues both hold `capacity` packages.
  pub fn with_capacity(id: impl Into<String>, capacity: usize) -> Result<Self, GraphError> {
    Ok(Self::new(
      id,
      Queue::bounded(capacity)?,
      Queue::bounded(capacity)?,
    ))
  }

  /// Creates a port with two [`DEFAULT_CAPACITY`](crate::queue::DEFAULT_CAPACITY) queues.
  pub fn with_default_capacity(id: impl Into<String>) -> Self {
    Self::new(id, Queue::default(), Queue::default())
  }

  /// Creates `count` ports named `{prefix}_0 .. {prefix}_{count-1}`.
  pub fn bank(prefix: &str, count: usize, capacity: usize) -> Result<Vec<Self>, GraphError> {
    (0..count)
      .map(|i| Self::with_capacity(format!("{prefix}_{i}"), capacity))
      .collect()
  }

  /// Closes both queues.
  pub fn close(&self) {
    self.input.close();
    self.output.close();
  }
}
