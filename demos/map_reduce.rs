//! Demo: sum recent amounts with a reader → mappers → reducers → writer graph.
//!
//! Usage: `cargo run --example map_reduce -- [--mappers N] [--capacity C] [--window-hours H]`
//!
//! Set RUST_LOG=fbp_weave=debug to see workers start and stop.

#[path = "map_reduce_graph.rs"]
mod map_reduce_graph;

use std::process;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use clap::Parser;
use fbp_weave::{InformationPackage, Network};
use map_reduce_graph::{GraphOptions, Totals, sample_entries, wire};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sum amounts whose timestamp falls inside a window.
#[derive(Parser, Debug)]
#[command(name = "map_reduce")]
struct Args {
  /// Parallel mappers (and as many reducers).
  #[arg(long, default_value_t = 3)]
  mappers: usize,

  /// Capacity of every port queue.
  #[arg(long, default_value_t = 100)]
  capacity: usize,

  /// Entries older than this many hours are left out of the sum.
  #[arg(long, default_value_t = 24)]
  window_hours: i64,

  /// Seconds to wait for the writer before giving up.
  #[arg(long, default_value_t = 5)]
  timeout_secs: u64,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();
  info!(?args, "map_reduce starting");

  let options = GraphOptions {
    mappers: args.mappers,
    capacity: args.capacity,
    window: TimeDelta::hours(args.window_hours),
  };
  let now = Utc::now();
  let totals = Arc::new(Totals::default());
  let mut network = Network::new();
  let reader = match wire(&mut network, options, now, Arc::clone(&totals)) {
    Ok(port) => port,
    Err(e) => {
      eprintln!("Graph error: {}", e);
      process::exit(1);
    }
  };
  info!(workers = network.worker_count(), "graph started");

  let entries = sample_entries(now);
  let expected = entries.len();
  if let Err(e) = reader
    .input
    .send(InformationPackage::with_payloads("ip1", entries))
    .await
  {
    eprintln!("Send error: {}", e);
    process::exit(1);
  }

  let finished = tokio::time::timeout(Duration::from_secs(args.timeout_secs), async {
    while totals.packages.load(Ordering::SeqCst) < expected {
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
  })
  .await;

  network.shutdown().await;
  if finished.is_err() {
    eprintln!("Timed out waiting for the writer");
    process::exit(1);
  }
  println!("Total amount: {}", totals.amount.load(Ordering::SeqCst));
}
