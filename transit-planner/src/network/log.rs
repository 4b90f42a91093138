//! Observation hooks for network mutations.
//!
//! The network reports every mutation attempt to an injected `MutationLog`.
//! Logging is best-effort and never influences the outcome of a mutation.

use std::fmt;

use tracing::{info, warn};

use crate::domain::NetworkError;

/// The kind of mutation being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    AddLocation,
    UpdateLocation,
    RemoveLocation,
    SetLocationActive,
    AddConnection,
    UpdateConnection,
    RemoveConnection,
    Clear,
}

impl Mutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutation::AddLocation => "add_location",
            Mutation::UpdateLocation => "update_location",
            Mutation::RemoveLocation => "remove_location",
            Mutation::SetLocationActive => "set_location_active",
            Mutation::AddConnection => "add_connection",
            Mutation::UpdateConnection => "update_connection",
            Mutation::RemoveConnection => "remove_connection",
            Mutation::Clear => "clear",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of mutation outcomes.
///
/// Implementations must be cheap and must not panic.
pub trait MutationLog: Send + Sync {
    /// Called after a mutation has been applied.
    fn succeeded(&self, mutation: Mutation, subject: &str);

    /// Called after a mutation has been rejected. The network is unchanged.
    fn failed(&self, mutation: Mutation, subject: &str, error: &NetworkError);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl MutationLog for NoopLog {
    fn succeeded(&self, _mutation: Mutation, _subject: &str) {}

    fn failed(&self, _mutation: Mutation, _subject: &str, _error: &NetworkError) {}
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl MutationLog for TracingLog {
    fn succeeded(&self, mutation: Mutation, subject: &str) {
        info!(mutation = %mutation, subject, "network mutation applied");
    }

    fn failed(&self, mutation: Mutation, subject: &str, error: &NetworkError) {
        warn!(mutation = %mutation, subject, error = %error, "network mutation rejected");
    }
}
