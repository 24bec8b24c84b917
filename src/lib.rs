//! # fbp-weave
//!
//! Flow-based programming runtime on tokio.
//!
//! ## Architecture
//!
//! A graph is built from three kinds of pieces:
//!
//! - [`Port`]: a named pair of bounded [`Queue`]s (`input`, `output`).
//! - [`Component`]: binds ports to a [`Task`] and runs one worker per port. Each worker reads
//!   a package, calls the task and publishes the results round-robin over the output ports.
//!   Task failures go to an [`ErrorSink`] and the package is dropped.
//! - [`Connection`]: moves packages from port outputs to port inputs in one of four
//!   [`Topology`] shapes (single, fan-out, fan-in, multi).
//!
//! Every worker watches a shared [`CancellationToken`]; [`Network`] owns one and collects the
//! [`Workers`] it starts. Full queues block senders, which is the only flow control.

pub mod component;
pub mod connection;
pub mod error;
pub mod error_sink;
pub mod network;
#[cfg(test)]
mod network_test;
pub mod port;
#[cfg(test)]
mod port_test;
pub mod queue;
#[cfg(test)]
mod queue_test;
pub mod task;
#[cfg(test)]
mod task_test;
pub mod types;
pub mod workers;

pub use component::Component;
pub use connection::{Connection, Topology};
pub use error::{GraphError, QueueClosed, StatusError};
pub use error_sink::{ErrorSink, LogErrorSink, TaskFailure};
pub use network::Network;
pub use port::Port;
pub use queue::{DEFAULT_CAPACITY, Queue};
pub use task::{FnTask, Task, TaskError, task_fn};
pub use tokio_util::sync::CancellationToken;
pub use types::{InformationPackage, Keyed, StatusIter, StatusSet, StatusValue};
pub use workers::Workers;
