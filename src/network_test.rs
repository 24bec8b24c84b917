//! Tests for `Network`.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::component::Component;
use crate::connection::Connection;
use crate::error::GraphError;
use crate::error_sink::LogErrorSink;
use crate::network::Network;
use crate::port::Port;
use crate::task::task_fn;
use crate::types::InformationPackage;

#[tokio::test]
async fn shutdown_stops_components_and_connections() {
  let mut network = Network::new();
  let src = Port::with_capacity("src", 4).unwrap();
  let stage = Port::with_capacity("stage", 4).unwrap();
  let upper = Arc::new(task_fn(|p: &InformationPackage| {
    Ok(vec![InformationPackage::new(p.id().to_uppercase())])
  }));

  network
    .start_connection(Connection::single(network.token(), "feed", src.clone(), stage.clone()))
    .unwrap();
  network.start_component(Component::new(
    network.token(),
    "upper",
    vec![stage.clone()],
    upper,
    Arc::new(LogErrorSink),
  ));
  assert_eq!(network.worker_count(), 2);

  src.output.send(InformationPackage::new("hi")).await.unwrap();
  let out = timeout(Duration::from_secs(5), stage.output.recv())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(out.id(), "HI");

  let panicked = timeout(Duration::from_secs(1), network.shutdown())
    .await
    .expect("network did not stop");
  assert_eq!(panicked, 0);
}

#[tokio::test]
async fn misconfigured_connection_starts_nothing() {
  let mut network = Network::new();
  let src = Port::bank("src", 1, 4).unwrap();
  let dst = Port::bank("dst", 2, 4).unwrap();

  let err = network
    .start_connection(Connection::multi(network.token(), "uneven", src, dst))
    .unwrap_err();
  assert!(matches!(err, GraphError::Misconfiguration { .. }));
  assert_eq!(network.worker_count(), 0);
}

#[tokio::test]
async fn parent_token_cancels_the_network() {
  let parent = CancellationToken::new();
  let mut network = Network::with_token(parent.child_token());
  let src = Port::with_capacity("p", 4).unwrap();
  let dst = Port::with_capacity("q", 4).unwrap();
  network
    .start_connection(Connection::single(network.token(), "loop", src, dst))
    .unwrap();

  parent.cancel();
  assert!(network.is_cancelled());
  timeout(Duration::from_secs(1), network.join())
    .await
    .expect("workers ignored the parent token");
}

#[tokio::test]
async fn join_returns_once_sources_close() {
  let mut network = Network::new();
  let src = Port::with_capacity("src", 4).unwrap();
  let dst = Port::with_capacity("dst", 4).unwrap();
  network
    .start_connection(Connection::single(network.token(), "feed", src.clone(), dst.clone()))
    .unwrap();

  src.output.close();
  timeout(Duration::from_secs(1), network.join())
    .await
    .expect("worker kept running on a closed source");
}
