//! The transport network graph.
//!
//! A `Network` owns a set of named locations and, per source location, an
//! ordered list of outgoing connections. Every mutation upholds referential
//! integrity: no connection ever names a location that does not exist.

mod graph;
mod log;

pub use graph::Network;
pub use log::{Mutation, MutationLog, NoopLog, TracingLog};
