//! Windowed map/reduce graph shared by the `map_reduce` demo and its integration test.
//!
//! ```text
//! reader ─fan-out─► mapper_0..n ─multi─► reducer_0..n ─fan-in─► writer
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use fbp_weave::{
  Component, Connection, ErrorSink, GraphError, InformationPackage, Keyed, LogErrorSink,
  Network, Port, Task, task_fn,
};
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct Entry {
  pub timestamp: DateTime<Utc>,
  pub amount: i64,
}

impl Keyed for Entry {
  fn key(&self) -> String {
    format!("{}_{}", self.timestamp.to_rfc3339(), self.amount)
  }
}

/// Amounts summed per timestamp by a mapper.
#[derive(Debug, Clone, Copy)]
struct Bucket {
  timestamp: DateTime<Utc>,
  amount: i64,
}

impl Keyed for Bucket {
  fn key(&self) -> String {
    format!("bucket_{}", self.timestamp.to_rfc3339())
  }
}

#[derive(Debug, Clone, Copy)]
struct Reduced(i64);

impl Keyed for Reduced {
  fn key(&self) -> String {
    "reduced".to_string()
  }
}

/// What the writer has accumulated so far.
#[derive(Debug, Default)]
pub struct Totals {
  pub amount: AtomicI64,
  pub packages: AtomicUsize,
}

/// Shape of the graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
  /// Parallel mappers, and as many reducers.
  pub mappers: usize,
  pub capacity: usize,
  /// Entries older than this are left out of the sum.
  pub window: TimeDelta,
}

/// Entries at 0h, -1h and -25h from `now`.
pub fn sample_entries(now: DateTime<Utc>) -> [Entry; 3] {
  [
    Entry {
      timestamp: now,
      amount: 1,
    },
    Entry {
      timestamp: now - TimeDelta::hours(1),
      amount: 2,
    },
    Entry {
      timestamp: now - TimeDelta::hours(25),
      amount: 3,
    },
  ]
}

fn mapper() -> impl Task {
  task_fn(|p: &InformationPackage| {
    let mut buckets: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();
    for (value, _) in p.status().iter() {
      let entry = value
        .downcast_ref::<Entry>()
        .ok_or("mapper expects entries")?;
      *buckets.entry(entry.timestamp).or_default() += entry.amount;
    }
    Ok(
      buckets
        .into_iter()
        .map(|(timestamp, amount)| {
          InformationPackage::with_payload(timestamp.to_rfc3339(), Bucket { timestamp, amount })
        })
        .collect(),
    )
  })
}

fn reducer(now: DateTime<Utc>, window: TimeDelta) -> impl Task {
  task_fn(move |p: &InformationPackage| {
    let mut sum = 0;
    for (value, _) in p.status().iter() {
      let bucket = value
        .downcast_ref::<Bucket>()
        .ok_or("reducer expects buckets")?;
      if now - bucket.timestamp <= window {
        sum += bucket.amount;
      }
    }
    Ok(vec![InformationPackage::with_payload(
      format!("reduced_{}", p.id()),
      Reduced(sum),
    )])
  })
}

fn writer(totals: Arc<Totals>) -> impl Task {
  task_fn(move |p: &InformationPackage| {
    let reduced = p.status().peek_as::<Reduced>("reduced")?;
    let acc = totals.amount.fetch_add(reduced.0, Ordering::SeqCst) + reduced.0;
    totals.packages.fetch_add(1, Ordering::SeqCst);
    info!(package = %p.id(), acc, "writer accumulated");
    Ok(Vec::new())
  })
}

/// Starts every component and connection on `network` and returns the reader port to feed.
pub fn wire(
  network: &mut Network,
  options: GraphOptions,
  now: DateTime<Utc>,
  totals: Arc<Totals>,
) -> Result<Port, GraphError> {
  let sink: Arc<dyn ErrorSink> = Arc::new(LogErrorSink);
  let reader = Port::with_capacity("reader", options.capacity)?;
  let mappers = Port::bank("mapper", options.mappers, options.capacity)?;
  let reducers = Port::bank("reducer", options.mappers, options.capacity)?;
  let writer_port = Port::with_capacity("writer", options.capacity)?;

  network.start_component(Component::new(
    network.token(),
    "reader",
    vec![reader.clone()],
    Arc::new(task_fn(|p: &InformationPackage| Ok(vec![p.clone()]))),
    Arc::clone(&sink),
  ));
  network.start_component(Component::new(
    network.token(),
    "mapper",
    mappers.clone(),
    Arc::new(mapper()),
    Arc::clone(&sink),
  ));
  network.start_component(Component::new(
    network.token(),
    "reducer",
    reducers.clone(),
    Arc::new(reducer(now, options.window)),
    Arc::clone(&sink),
  ));
  network.start_component(
    Component::new(
      network.token(),
      "writer",
      vec![writer_port.clone()],
      Arc::new(writer(totals)),
      sink,
    )
    .with_outputs(vec![]),
  );

  network.start_connection(Connection::fan_out(
    network.token(),
    "reader-mappers",
    reader.clone(),
    mappers.clone(),
  ))?;
  network.start_connection(Connection::multi(
    network.token(),
    "mappers-reducers",
    mappers,
    reducers.clone(),
  ))?;
  network.start_connection(Connection::fan_in(
    network.token(),
    "reducers-writer",
    reducers,
    writer_port,
  ))?;

  Ok(reader)
}
