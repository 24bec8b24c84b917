//! The user-supplied work a component performs on each package.

use async_trait::async_trait;

use crate::types::InformationPackage;

/// Failure returned by a task. Any error type converts into it with `?`.
pub type TaskError = Box<dyn std::error::Error + Send + Sync>;

/// Turns one input package into zero or more output packages.
///
/// A component calls `execute` at most once at a time per bound port. A task bound to a
/// component with several ports, or shared between components, is called concurrently.
#[async_trait]
pub trait Task: Send + Sync {
  async fn execute(&self, input: &InformationPackage)
  -> Result<Vec<InformationPackage>, TaskError>;
}

/// Adapts a synchronous closure into a [`Task`].
pub struct FnTask<F> {
  f: F,
}

/// Wraps `f` as a [`Task`].
pub fn task_fn<F>(f: F) -> FnTask<F>
where
  F: Fn(&InformationPackage) -> Result<Vec<InformationPackage>, TaskError> + Send + Sync,
{
  FnTask { f }
}

#[async_trait]
impl<F> Task for FnTask<F>
where
  F: Fn(&InformationPackage) -> Result<Vec<InformationPackage>, TaskError> + Send + Sync,
{
  async fn execute(
    &self,
    input: &InformationPackage,
  ) -> Result<Vec<InformationPackage>, TaskError> {
    (self.f)(input)
  }
}
