//! The envelope that moves through ports: an id plus a [`StatusSet`] payload.

use std::any::Any;

use super::StatusSet;

/// A payload that knows the status key it is stored under.
pub trait Keyed {
  fn key(&self) -> String;
}

/// Unit of work flowing through the graph.
///
/// Packages move by value through queues, so exactly one stage holds a package at a time.
/// A task that turns one input into `k` outputs builds `k` new packages.
#[derive(Debug, Clone)]
pub struct InformationPackage {
  id: String,
  status: StatusSet,
}

impl InformationPackage {
  /// Creates a package with an empty status.
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      status: StatusSet::new(),
    }
  }

  /// Creates an empty package with a fresh random id.
  pub fn generated() -> Self {
    Self::new(uuid::Uuid::new_v4().to_string())
  }

  /// Creates a package seeded with one payload stored under its own key.
  pub fn with_payload<T>(id: impl Into<String>, payload: T) -> Self
  where
    T: Keyed + Any + Send + Sync,
  {
    let package = Self::new(id);
    package.status.add(payload.key(), payload);
    package
  }

  /// Creates a package seeded with each payload stored under its own key, in order.
  pub fn with_payloads<I, T>(id: impl Into<String>, payloads: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Keyed + Any + Send + Sync,
  {
    let package = Self::new(id);
    for payload in payloads {
      package.status.add(payload.key(), payload);
    }
    package
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn status(&self) -> &StatusSet {
    &self.status
  }
}
