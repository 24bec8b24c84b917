//! Keyed, insertion-ordered payload container carried by every information package.
//!
//! Values are opaque (`Arc<dyn Any + Send + Sync>`), the same way items flow through the
//! graph. Tasks downcast to the types they expect with [`StatusSet::peek_as`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::StatusError;

/// A value stored in a [`StatusSet`].
pub type StatusValue = Arc<dyn Any + Send + Sync>;

/// Entries in insertion order plus a key index into them.
#[derive(Clone, Default)]
struct Entries {
  order: Vec<(String, StatusValue)>,
  index: HashMap<String, usize>,
}

/// Ordered map from string keys to opaque values.
///
/// Many readers may hold the set at once; `add` takes the write lock.
/// Overwriting a key keeps the position of its first insertion.
#[derive(Default)]
pub struct StatusSet {
  entries: RwLock<Entries>,
}

impl StatusSet {
  pub fn new() -> Self {
    Self::default()
  }

  fn read(&self) -> RwLockReadGuard<'_, Entries> {
    self.entries.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Entries> {
    self.entries.write().unwrap_or_else(PoisonError::into_inner)
  }

  /// Inserts `value` under `key`, overwriting any previous value in place.
  pub fn add<T>(&self, key: impl Into<String>, value: T)
  where
    T: Any + Send + Sync,
  {
    self.add_shared(key, Arc::new(value));
  }

  /// Like [`StatusSet::add`] for a value that is already shared.
  pub fn add_shared(&self, key: impl Into<String>, value: StatusValue) {
    let key = key.into();
    let mut entries = self.write();
    if let Some(&pos) = entries.index.get(&key) {
      entries.order[pos].1 = value;
      return;
    }
    let pos = entries.order.len();
    entries.index.insert(key.clone(), pos);
    entries.order.push((key, value));
  }

  /// Returns the value stored under `key`.
  pub fn peek(&self, key: &str) -> Result<StatusValue, StatusError> {
    let entries = self.read();
    entries
      .index
      .get(key)
      .map(|&pos| Arc::clone(&entries.order[pos].1))
      .ok_or_else(|| StatusError::KeyNotFound {
        key: key.to_string(),
      })
  }

  /// Returns the value stored under `key` downcast to `T`.
  pub fn peek_as<T>(&self, key: &str) -> Result<Arc<T>, StatusError>
  where
    T: Any + Send + Sync,
  {
    self
      .peek(key)?
      .downcast::<T>()
      .map_err(|_| StatusError::TypeMismatch {
        key: key.to_string(),
      })
  }

  /// True when an entry is stored under `key`.
  pub fn contains(&self, key: &str) -> bool {
    self.read().index.contains_key(key)
  }

  /// Number of entries.
  pub fn count(&self) -> usize {
    self.read().order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.count() == 0
  }

  /// Keys in insertion order.
  pub fn keys(&self) -> Vec<String> {
    self.read().order.iter().map(|(k, _)| k.clone()).collect()
  }

  /// Returns a fresh cursor over the values in insertion order.
  ///
  /// The cursor walks a snapshot taken now; adds made afterwards are not visible to it.
  pub fn iter(&self) -> StatusIter {
    let values: Vec<StatusValue> = self
      .read()
      .order
      .iter()
      .map(|(_, v)| Arc::clone(v))
      .collect();
    StatusIter {
      values: values.into_iter(),
    }
  }
}

impl Clone for StatusSet {
  fn clone(&self) -> Self {
    Self {
      entries: RwLock::new(self.read().clone()),
    }
  }
}

impl fmt::Debug for StatusSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StatusSet")
      .field("keys", &self.keys())
      .finish()
  }
}

/// One-shot cursor over a [`StatusSet`], yielding `(value, is_last)`.
pub struct StatusIter {
  values: std::vec::IntoIter<StatusValue>,
}

impl Iterator for StatusIter {
  type Item = (StatusValue, bool);

  fn next(&mut self) -> Option<Self::Item> {
    let value = self.values.next()?;
    let is_last = self.values.len() == 0;
    Some((value, is_last))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    self.values.size_hint()
  }
}

impl ExactSizeIterator for StatusIter {}
