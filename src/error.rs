//! Error types for graph wiring and payload access.

use crate::types::InformationPackage;

/// Errors raised while building or starting a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
  /// A connection's source and destination lists cannot be wired together.
  #[error("connection '{connection}' misconfigured: {reason}")]
  Misconfiguration { connection: String, reason: String },

  /// Queues must hold at least one package.
  #[error("invalid queue capacity {capacity}: must be at least 1")]
  InvalidCapacity { capacity: usize },
}

impl GraphError {
  pub(crate) fn misconfigured(connection: &str, reason: impl Into<String>) -> Self {
    Self::Misconfiguration {
      connection: connection.to_string(),
      reason: reason.into(),
    }
  }
}

/// Errors returned by [`StatusSet`](crate::types::StatusSet) lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
  /// No entry is stored under the key.
  #[error("status key '{key}' not found")]
  KeyNotFound { key: String },

  /// An entry exists but holds a value of another type.
  #[error("status key '{key}' holds a value of another type")]
  TypeMismatch { key: String },
}

/// Send on a queue that has been closed. Carries the package back to the caller.
#[derive(Debug, thiserror::Error)]
#[error("queue closed, package '{}' not delivered", .0.id())]
pub struct QueueClosed(pub InformationPackage);

impl QueueClosed {
  /// Recovers the undelivered package.
  pub fn into_inner(self) -> InformationPackage {
    self.0
  }
}
