//! Tests for `Port`.

use crate::error::GraphError;
use crate::port::Port;
use crate::queue::Queue;
use crate::types::InformationPackage;

#[tokio::test]
async fn input_and_output_are_distinct_queues() {
  let port = Port::new("p", Queue::bounded(2).unwrap(), Queue::bounded(3).unwrap());
  assert_eq!(port.input.capacity(), 2);
  assert_eq!(port.output.capacity(), 3);

  port.input.send(InformationPackage::new("in")).await.unwrap();
  assert!(port.output.try_recv().is_none());
  assert_eq!(port.input.recv().await.unwrap().id(), "in");
}

#[test]
fn with_capacity_rejects_zero() {
  assert!(matches!(
    Port::with_capacity("p", 0),
    Err(GraphError::InvalidCapacity { capacity: 0 })
  ));
}

#[test]
fn bank_names_ports_by_index() {
  let ports = Port::bank("mapper", 3, 8).unwrap();
  let ids: Vec<&str> = ports.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, vec!["mapper_0", "mapper_1", "mapper_2"]);
  assert!(ports.iter().all(|p| p.input.capacity() == 8));
}

#[test]
fn close_closes_both_queues() {
  let port = Port::with_default_capacity("p");
  port.close();
  assert!(port.input.is_closed());
  assert!(port.output.is_closed());
}
