//! Side channel for task failures raised inside component workers.

use std::fmt;

use tracing::error;

use crate::task::TaskError;

/// One failed task call, with where it happened.
#[derive(Debug)]
pub struct TaskFailure {
  /// Component whose task failed.
  pub component: String,
  /// Input port the package arrived on.
  pub port: String,
  /// Id of the package that was dropped.
  pub package: String,
  pub error: TaskError,
}

impl fmt::Display for TaskFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "component '{}' failed on package '{}' from port '{}': {}",
      self.component, self.package, self.port, self.error
    )
  }
}

/// Receives task failures. Handling a failure never stops the component that reported it.
pub trait ErrorSink: Send + Sync {
  fn handle(&self, failure: TaskFailure);
}

/// Records every failure as an error-level `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
  fn handle(&self, failure: TaskFailure) {
    error!(
      component = %failure.component,
      port = %failure.port,
      package = %failure.package,
      error = %failure.error,
      "task failed"
    );
  }
}
