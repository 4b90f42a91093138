//! Domain types for the transit route planner.
//!
//! This module contains the value types that make up a transport network.
//! All types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod connection;
mod error;
mod location;

pub use connection::{Connection, Costs};
pub use error::NetworkError;
pub use location::{Coordinates, Location};
