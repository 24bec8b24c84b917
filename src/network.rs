//! A running graph: one cancellation token plus every worker started under it.

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::component::Component;
use crate::connection::Connection;
use crate::error::GraphError;
use crate::workers::Workers;

/// Owns the token that stops a graph and the workers it has started.
///
/// Build components and connections with [`Network::token`] so that [`Network::cancel`]
/// reaches them. Draining queues before shutdown is left to the caller.
#[derive(Debug, Default)]
pub struct Network {
  cancel: CancellationToken,
  workers: Workers,
}

impl Network {
  pub fn new() -> Self {
    Self::default()
  }

  /// Runs under an existing token, e.g. a child of an application-wide one.
  pub fn with_token(cancel: CancellationToken) -> Self {
    Self {
      cancel,
      workers: Workers::new(),
    }
  }

  /// A handle to the network's token.
  pub fn token(&self) -> CancellationToken {
    self.cancel.clone()
  }

  pub fn start_component(&mut self, component: Component) {
    self.workers.extend(component.start());
  }

  /// Starts `connection`, or returns its misconfiguration without starting anything.
  pub fn start_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
    self.workers.extend(connection.start()?);
    Ok(())
  }

  /// Number of workers started so far.
  pub fn worker_count(&self) -> usize {
    self.workers.len()
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancel.is_cancelled()
  }

  /// Fires the token. Workers finish their current step and exit.
  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  /// Waits for every worker to exit on its own. Returns how many panicked.
  pub async fn join(self) -> usize {
    self.workers.join().await
  }

  /// Cancels the network and waits for every worker. Returns how many panicked.
  #[instrument(level = "debug", skip(self), fields(workers = self.workers.len()))]
  pub async fn shutdown(self) -> usize {
    self.cancel.cancel();
    let panicked = self.workers.join().await;
    info!(panicked, "network stopped");
    panicked
  }
}
