//! Forwarding workers that move packages from port outputs to port inputs.
//!
//! | Topology | Workers | Routing |
//! |---|---|---|
//! | [`Topology::Single`] | 1 | `from.output → to.input` |
//! | [`Topology::FanOut`] | 1 | item `i` → `to[i mod m].input` |
//! | [`Topology::FanIn`] | n | each `from[i].output → to.input` |
//! | [`Topology::Multi`] | n | `from[i].output → to[i].input` |
//!
//! A worker blocks while its destination is full, so backpressure reaches the source queue.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::error::{GraphError, QueueClosed};
use crate::port::Port;
use crate::workers::Workers;

/// How a connection's sources map onto its destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
  Single,
  FanOut,
  FanIn,
  Multi,
}

impl fmt::Display for Topology {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Topology::Single => "single",
      Topology::FanOut => "fan-out",
      Topology::FanIn => "fan-in",
      Topology::Multi => "multi",
    };
    f.write_str(name)
  }
}

/// A set of source ports wired to a set of destination ports.
#[derive(Debug)]
pub struct Connection {
  id: String,
  cancel: CancellationToken,
  topology: Topology,
  from: Vec<Port>,
  to: Vec<Port>,
}

impl Connection {
  /// One source to one destination, order preserved.
  pub fn single(cancel: CancellationToken, id: impl Into<String>, from: Port, to: Port) -> Self {
    Self::with_topology(cancel, id, Topology::Single, vec![from], vec![to])
  }

  /// One source distributed round-robin over `to`.
  pub fn fan_out(
    cancel: CancellationToken,
    id: impl Into<String>,
    from: Port,
    to: Vec<Port>,
  ) -> Self {
    Self::with_topology(cancel, id, Topology::FanOut, vec![from], to)
  }

  /// Every source merged into one destination.
  pub fn fan_in(
    cancel: CancellationToken,
    id: impl Into<String>,
    from: Vec<Port>,
    to: Port,
  ) -> Self {
    Self::with_topology(cancel, id, Topology::FanIn, from, vec![to])
  }

  /// Pairwise `from[i] → to[i]`. Both lists must have the same length.
  pub fn multi(
    cancel: CancellationToken,
    id: impl Into<String>,
    from: Vec<Port>,
    to: Vec<Port>,
  ) -> Self {
    Self::with_topology(cancel, id, Topology::Multi, from, to)
  }

  fn with_topology(
    cancel: CancellationToken,
    id: impl Into<String>,
    topology: Topology,
    from: Vec<Port>,
    to: Vec<Port>,
  ) -> Self {
    Self {
      id: id.into(),
      cancel,
      topology,
      from,
      to,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn topology(&self) -> Topology {
    self.topology
  }

  fn validate(&self) -> Result<(), GraphError> {
    if self.from.is_empty() {
      return Err(GraphError::misconfigured(&self.id, "no source ports"));
    }
    if self.to.is_empty() {
      return Err(GraphError::misconfigured(&self.id, "no destination ports"));
    }
    if self.topology == Topology::Multi && self.from.len() != self.to.len() {
      return Err(GraphError::misconfigured(
        &self.id,
        format!(
          "there must be the same number of in and out ports ({} sources, {} destinations)",
          self.from.len(),
          self.to.len()
        ),
      ));
    }
    Ok(())
  }

  /// Validates the wiring and spawns the forwarding workers.
  ///
  /// On a misconfiguration nothing is spawned.
  #[instrument(
    level = "debug",
    skip(self),
    fields(connection = %self.id, topology = %self.topology)
  )]
  pub fn start(self) -> Result<Workers, GraphError> {
    self.validate()?;
    info!(
      sources = self.from.len(),
      destinations = self.to.len(),
      "starting connection"
    );

    let routes: Vec<(Port, Vec<Port>)> = match self.topology {
      // Single and FanOut have one source; FanIn has one destination.
      Topology::Single | Topology::FanOut | Topology::FanIn => {
        let to = self.to;
        self.from.into_iter().map(|src| (src, to.clone())).collect()
      }
      Topology::Multi => self
        .from
        .into_iter()
        .zip(self.to)
        .map(|(src, dst)| (src, vec![dst]))
        .collect(),
    };

    let mut workers = Workers::new();
    for (source, targets) in routes {
      let span = info_span!("connection_worker", connection = %self.id, source = %source.id);
      let forwarder = Forwarder {
        connection: self.id.clone(),
        source,
        targets,
        cancel: self.cancel.clone(),
      };
      workers.push(tokio::spawn(forwarder.run().instrument(span)));
    }
    Ok(workers)
  }
}

/// Moves packages from one source output to a round-robin list of destination inputs.
struct Forwarder {
  connection: String,
  source: Port,
  targets: Vec<Port>,
  cancel: CancellationToken,
}

impl Forwarder {
  async fn run(self) {
    let m = self.targets.len();
    let mut k = 0;
    loop {
      let received = tokio::select! {
        biased;
        _ = self.cancel.cancelled() => {
          debug!("connection worker cancelled");
          return;
        }
        package = self.source.output.recv() => package,
      };

      let Some(package) = received else {
        info!(id = %self.source.id, "source port closed");
        return;
      };

      let target = &self.targets[k];
      tokio::select! {
        biased;
        sent = target.input.send(package) => {
          if let Err(QueueClosed(dropped)) = sent {
            warn!(
              connection = %self.connection,
              port = %target.id,
              package = %dropped.id(),
              "destination port closed, stopping connection worker"
            );
            return;
          }
        }
        _ = self.cancel.cancelled() => {
          debug!("connection worker cancelled while forwarding");
          return;
        }
      }
      k = (k + 1) % m;
    }
  }
}
