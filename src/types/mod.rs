//! Value types that flow through the graph.
//!
//! Packages move through ports by value; their payload values are `Arc<dyn Any + Send + Sync>`.

mod information_package;
mod status_set;

pub use information_package::{InformationPackage, Keyed};
pub use status_set::{StatusIter, StatusSet, StatusValue};
