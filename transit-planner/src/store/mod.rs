//! Persistence for networks and preference profiles.
//!
//! Connections are exchanged as CSV, whole networks and profiles as JSON.
//! Nothing here is required by the core: a `Network` built in memory never
//! touches this module.

mod connections;
mod snapshot;

pub use connections::{ImportSummary, export_connections, import_connections, load_network, save_network};
pub use snapshot::{NetworkSnapshot, load_profile, load_snapshot, save_profile, save_snapshot};

use serde::{Deserialize, Serialize};

use crate::domain::{Connection, Location, NetworkError};

/// Errors that can occur when reading or writing persisted data.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted data describes a network that cannot be rebuilt
    #[error("invalid network data: {0}")]
    Network(#[from] NetworkError),

    /// A profile whose weights are negative or do not sum to 1.0
    #[error("invalid preference profile: {0}")]
    InvalidProfile(String),
}

/// A connection as stored on disk.
///
/// Field names follow the CSV header
/// `source,destination,distance,time,cost,transfers,transport_mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source: String,
    pub destination: String,
    pub distance: f64,
    pub time: f64,
    pub cost: f64,
    pub transfers: u32,
    #[serde(default)]
    pub transport_mode: String,
}

impl From<&Connection> for ConnectionRecord {
    fn from(c: &Connection) -> Self {
        Self {
            source: c.source().to_string(),
            destination: c.destination().to_string(),
            distance: c.distance(),
            time: c.time(),
            cost: c.fare(),
            transfers: c.transfers(),
            transport_mode: c.mode().to_string(),
        }
    }
}

/// A location as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl From<&Location> for LocationRecord {
    fn from(l: &Location) -> Self {
        Self {
            name: l.name().to_string(),
            latitude: l.latitude(),
            longitude: l.longitude(),
            category: l.category().map(str::to_string),
            active: l.is_active(),
        }
    }
}
