//! Long-lived worker that serves packages arriving on its ports with a [`Task`].
//!
//! Each bound port gets its own worker:
//!
//! ```text
//! idle ─► reading ─► executing ─► publishing ─► idle
//!   └──────────┴──────────┴────────────┴──► stopped   (token fired / input closed)
//! ```
//!
//! Packages on one port are handled strictly in arrival order; workers of different ports
//! run in parallel. Output `j` of a call goes to `outputs[j mod N].output`, where the
//! output list is the bound port list unless [`Component::with_outputs`] replaced it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::error::QueueClosed;
use crate::error_sink::{ErrorSink, TaskFailure};
use crate::port::Port;
use crate::task::Task;
use crate::types::InformationPackage;
use crate::workers::Workers;

/// Binds input ports to a task and publishes the task's results.
pub struct Component {
  cancel: CancellationToken,
  id: String,
  ports: Vec<Port>,
  /// Publishing targets when they differ from `ports`.
  outputs: Option<Vec<Port>>,
  task: Arc<dyn Task>,
  error_sink: Arc<dyn ErrorSink>,
}

impl Component {
  pub fn new(
    cancel: CancellationToken,
    id: impl Into<String>,
    ports: Vec<Port>,
    task: Arc<dyn Task>,
    error_sink: Arc<dyn ErrorSink>,
  ) -> Self {
    Self {
      cancel,
      id: id.into(),
      ports,
      outputs: None,
      task,
      error_sink,
    }
  }

  /// Publishes results round-robin over `outputs` instead of over the bound ports.
  ///
  /// An empty list makes the component a sink: results are discarded with a warning.
  pub fn with_outputs(mut self, outputs: Vec<Port>) -> Self {
    self.outputs = Some(outputs);
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// The ports this component reads from.
  pub fn ports(&self) -> &[Port] {
    &self.ports
  }

  /// Spawns one worker per bound port and returns their handles.
  #[instrument(level = "debug", skip(self), fields(component = %self.id))]
  pub fn start(self) -> Workers {
    let outputs: Arc<[Port]> = self.outputs.unwrap_or_else(|| self.ports.clone()).into();
    info!(
      ports = self.ports.len(),
      outputs = outputs.len(),
      "starting component"
    );

    let mut workers = Workers::new();
    for port in self.ports {
      let span = info_span!("component_worker", component = %self.id, port = %port.id);
      let worker = PortWorker {
        component: self.id.clone(),
        port,
        outputs: Arc::clone(&outputs),
        task: Arc::clone(&self.task),
        error_sink: Arc::clone(&self.error_sink),
        cancel: self.cancel.clone(),
      };
      workers.push(tokio::spawn(worker.run().instrument(span)));
    }
    workers
  }
}

/// State owned by the worker serving one input port.
struct PortWorker {
  component: String,
  port: Port,
  outputs: Arc<[Port]>,
  task: Arc<dyn Task>,
  error_sink: Arc<dyn ErrorSink>,
  cancel: CancellationToken,
}

impl PortWorker {
  async fn run(self) {
    debug!("worker started");
    loop {
      let received = tokio::select! {
        biased;
        _ = self.cancel.cancelled() => {
          debug!("component worker cancelled");
          return;
        }
        package = self.port.input.recv() => package,
      };

      let Some(package) = received else {
        info!(id = %self.port.id, "in port closed");
        return;
      };

      match self.task.execute(&package).await {
        Ok(results) => {
          if !self.publish(results).await {
            return;
          }
        }
        Err(error) => self.error_sink.handle(TaskFailure {
          component: self.component.clone(),
          port: self.port.id.clone(),
          package: package.id().to_string(),
          error,
        }),
      }
    }
  }

  /// Sends `results` round-robin over the output ports.
  ///
  /// Returns false when the token fired while waiting on a full queue; unsent results are dropped.
  async fn publish(&self, results: Vec<InformationPackage>) -> bool {
    if results.is_empty() {
      return true;
    }
    if self.outputs.is_empty() {
      warn!(
        component_id = %self.component,
        discarded = results.len(),
        "there are no out ports defined"
      );
      return true;
    }

    let n = self.outputs.len();
    for (j, package) in results.into_iter().enumerate() {
      let target = &self.outputs[j % n];
      tokio::select! {
        biased;
        sent = target.output.send(package) => {
          if let Err(QueueClosed(dropped)) = sent {
            warn!(port = %target.id, package = %dropped.id(), "out queue closed, dropping package");
          }
        }
        _ = self.cancel.cancelled() => {
          debug!("component worker cancelled while publishing");
          return false;
        }
      }
    }
    true
  }
}
