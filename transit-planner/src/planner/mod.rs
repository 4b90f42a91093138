//! Route finding.
//!
//! This module implements single-source shortest path over a `Network`,
//! parameterised by a cost criterion: one of the four cost components of a
//! connection, or a weighted blend of all four taken from a preference
//! profile.
//!
//! The route finder holds no state between calls. It takes a full read pass
//! over the network per query and never mutates it.

mod criterion;
mod history;
mod rank;
mod search;
mod state;

pub use criterion::Criterion;
pub use history::{HistoryEntry, HistoryStats, RouteHistory};
pub use rank::{deduplicate, rank_routes};
pub use search::{RouteFinder, RouteResult, find_route};
