//! Tests for `Queue`.

use std::time::Duration;

use futures::StreamExt;
use tokio_test::{assert_err, assert_ok};

use crate::error::GraphError;
use crate::queue::{DEFAULT_CAPACITY, Queue};
use crate::types::InformationPackage;

#[test]
fn zero_capacity_is_rejected() {
  let err = Queue::bounded(0).unwrap_err();
  assert!(matches!(err, GraphError::InvalidCapacity { capacity: 0 }));
}

#[test]
fn default_queue_uses_default_capacity() {
  assert_eq!(DEFAULT_CAPACITY.get(), 100);
  let q = Queue::default();
  assert_eq!(q.capacity(), DEFAULT_CAPACITY.get());
  assert!(q.is_empty());
  assert!(!q.is_closed());
}

#[tokio::test]
async fn fifo_order() {
  let q = Queue::bounded(4).unwrap();
  for id in ["x", "y", "z"] {
    assert_ok!(q.send(InformationPackage::new(id)).await);
  }
  assert_eq!(q.len(), 3);
  let ids: Vec<String> = vec![
    q.recv().await.unwrap().id().to_string(),
    q.recv().await.unwrap().id().to_string(),
    q.recv().await.unwrap().id().to_string(),
  ];
  assert_eq!(ids, vec!["x", "y", "z"]);
}

#[tokio::test]
async fn send_waits_while_full() {
  let q = Queue::bounded(1).unwrap();
  q.send(InformationPackage::new("a")).await.unwrap();

  let blocked = tokio::time::timeout(
    Duration::from_millis(50),
    q.send(InformationPackage::new("b")),
  )
  .await;
  assert!(blocked.is_err(), "second send should wait for space");

  let producer = {
    let q = q.clone();
    tokio::spawn(async move { q.send(InformationPackage::new("c")).await })
  };
  assert_eq!(q.recv().await.unwrap().id(), "a");
  assert_ok!(producer.await.unwrap());
  assert_eq!(q.recv().await.unwrap().id(), "c");
}

#[tokio::test]
async fn closed_queue_drains_then_ends() {
  let q = Queue::bounded(4).unwrap();
  q.send(InformationPackage::new("a")).await.unwrap();
  q.send(InformationPackage::new("b")).await.unwrap();
  q.close();
  assert!(q.is_closed());
  assert_eq!(q.len(), 2);

  assert_eq!(q.recv().await.unwrap().id(), "a");
  assert_eq!(q.recv().await.unwrap().id(), "b");
  assert!(q.recv().await.is_none());
}

#[tokio::test]
async fn send_on_closed_queue_returns_package() {
  let q = Queue::bounded(2).unwrap();
  q.close();
  let err = assert_err!(q.send(InformationPackage::new("late")).await);
  assert_eq!(err.into_inner().id(), "late");
}

#[tokio::test]
async fn try_recv_does_not_wait() {
  let q = Queue::bounded(2).unwrap();
  assert!(q.try_recv().is_none());
  q.send(InformationPackage::new("a")).await.unwrap();
  assert_eq!(q.try_recv().unwrap().id(), "a");
}

#[tokio::test]
async fn clones_share_the_same_queue() {
  let q = Queue::bounded(2).unwrap();
  let other = q.clone();
  other.send(InformationPackage::new("shared")).await.unwrap();
  assert_eq!(q.recv().await.unwrap().id(), "shared");
  other.close();
  assert!(q.is_closed());
}

#[tokio::test]
async fn into_stream_ends_after_close() {
  let q = Queue::bounded(4).unwrap();
  for id in ["1", "2", "3"] {
    q.send(InformationPackage::new(id)).await.unwrap();
  }
  q.close();
  let ids: Vec<String> = q
    .into_stream()
    .map(|p| p.id().to_string())
    .collect()
    .await;
  assert_eq!(ids, vec!["1", "2", "3"]);
}
