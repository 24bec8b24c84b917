//! Tests for `Task` and `task_fn`.

use std::sync::Arc;

use crate::error::StatusError;
use crate::task::{Task, TaskError, task_fn};
use crate::types::InformationPackage;

#[tokio::test]
async fn closure_task_returns_its_outputs() {
  let split = task_fn(|p: &InformationPackage| {
    Ok(
      p.id()
        .split(',')
        .map(InformationPackage::new)
        .collect(),
    )
  });
  let out = split.execute(&InformationPackage::new("a,b")).await.unwrap();
  let ids: Vec<_> = out.iter().map(|p| p.id().to_string()).collect();
  assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn status_errors_propagate_with_question_mark() {
  let needs_total = task_fn(|p: &InformationPackage| {
    let total = p.status().peek_as::<u64>("total")?;
    Ok(vec![InformationPackage::new(total.to_string())])
  });

  let err: TaskError = needs_total
    .execute(&InformationPackage::new("empty"))
    .await
    .unwrap_err();
  let status = err.downcast_ref::<StatusError>().expect("status error");
  assert_eq!(
    status,
    &StatusError::KeyNotFound {
      key: "total".to_string()
    }
  );
}

#[tokio::test]
async fn tasks_can_be_shared_as_trait_objects() {
  let shared: Arc<dyn Task> = Arc::new(task_fn(|_: &InformationPackage| Ok(Vec::new())));
  let other = Arc::clone(&shared);
  assert!(other.execute(&InformationPackage::new("x")).await.unwrap().is_empty());
  assert!(shared.execute(&InformationPackage::new("y")).await.unwrap().is_empty());
}
