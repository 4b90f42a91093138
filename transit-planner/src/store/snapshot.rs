//! JSON snapshots of whole networks, and preference profile files.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ConnectionRecord, LocationRecord, StoreError};
use crate::domain::Costs;
use crate::network::{MutationLog, Network};
use crate::preferences::{PreferenceProfile, validate_weights};

/// Every location and connection of a network, in a serialisable form.
///
/// Unlike the CSV format, a snapshot keeps coordinates, categories and the
/// active flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub locations: Vec<LocationRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl NetworkSnapshot {
    pub fn capture(network: &Network) -> Self {
        Self {
            locations: network.locations().map(LocationRecord::from).collect(),
            connections: network.all_connections().map(ConnectionRecord::from).collect(),
        }
    }

    /// Rebuild a network, reporting mutations to `log`.
    ///
    /// # Errors
    ///
    /// Fails on the first location or connection the network rejects, so a
    /// snapshot either restores completely or not at all.
    pub fn restore(&self, log: Arc<dyn MutationLog>) -> Result<Network, StoreError> {
        let mut network = Network::with_log(log);

        for l in &self.locations {
            network.add_location(&l.name, l.latitude, l.longitude, l.category.as_deref())?;
            if !l.active {
                network.set_location_active(&l.name, false)?;
            }
        }

        for c in &self.connections {
            let costs = Costs::new(c.distance, c.time, c.cost, c.transfers)?;
            network.add_connection(&c.source, &c.destination, costs, &c.transport_mode)?;
        }

        Ok(network)
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Write a snapshot of `network` to a JSON file, replacing it.
pub fn save_snapshot(network: &Network, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    write_json(&NetworkSnapshot::capture(network), path)?;
    info!(
        path = %path.display(),
        locations = network.location_count(),
        connections = network.connection_count(),
        "saved network snapshot"
    );
    Ok(())
}

/// Read a network snapshot from a JSON file.
pub fn load_snapshot(path: impl AsRef<Path>, log: Arc<dyn MutationLog>) -> Result<Network, StoreError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let snapshot: NetworkSnapshot = serde_json::from_str(&contents)?;
    let network = snapshot.restore(log)?;
    info!(
        path = %path.display(),
        locations = network.location_count(),
        connections = network.connection_count(),
        "loaded network snapshot"
    );
    Ok(network)
}

pub fn save_profile(profile: &PreferenceProfile, path: impl AsRef<Path>) -> Result<(), StoreError> {
    write_json(profile, path.as_ref())
}

/// Read a preference profile, rejecting one whose weights do not validate.
pub fn load_profile(path: impl AsRef<Path>) -> Result<PreferenceProfile, StoreError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let profile: PreferenceProfile = serde_json::from_str(&contents)?;
    if !validate_weights(&profile) {
        return Err(StoreError::InvalidProfile(format!(
            "weights must be non-negative and sum to 1.0, got {:.3}",
            profile.weight_sum()
        )));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NetworkError;
    use crate::network::NoopLog;
    use crate::preferences::template;

    fn network() -> Network {
        let mut network = Network::new();
        network.add_location("Central", 51.5074, -0.1278, Some("hub")).unwrap();
        network.add_location("Depot", 51.52, -0.09, None).unwrap();
        network.set_location_active("Depot", false).unwrap();
        network
            .add_connection("Central", "Depot", Costs::new(2500.0, 12.5, 250.0, 1).unwrap(), "tram")
            .unwrap();
        network
    }

    #[test]
    fn snapshot_keeps_everything() {
        let original = network();
        let restored = NetworkSnapshot::capture(&original)
            .restore(Arc::new(NoopLog))
            .unwrap();

        assert_eq!(restored.location("Central"), original.location("Central"));
        assert_eq!(restored.location("Depot"), original.location("Depot"));
        assert!(!restored.location("Depot").unwrap().is_active());
        assert_eq!(
            restored.connection("Central", "Depot"),
            original.connection("Central", "Depot")
        );
    }

    #[test]
    fn restore_rejects_dangling_connection() {
        let mut snapshot = NetworkSnapshot::capture(&network());
        snapshot.locations.retain(|l| l.name != "Depot");

        let err = snapshot.restore(Arc::new(NoopLog)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Network(NetworkError::UnknownLocation(name)) if name == "Depot"
        ));
    }

    #[test]
    fn active_defaults_to_true() {
        let json = r#"{
            "locations": [{ "name": "A", "latitude": 1.0, "longitude": 2.0 }],
            "connections": []
        }"#;
        let snapshot: NetworkSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.locations[0].active);
        assert_eq!(snapshot.locations[0].category, None);
    }

    #[test]
    fn snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");

        save_snapshot(&network(), &path).unwrap();
        let loaded = load_snapshot(&path, Arc::new(NoopLog)).unwrap();
        assert_eq!(loaded.location_count(), 2);
        assert_eq!(loaded.connection_count(), 1);
    }

    #[test]
    fn malformed_snapshot_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_snapshot(&path, Arc::new(NoopLog)).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        save_profile(&template("comfortable"), &path).unwrap();
        assert_eq!(load_profile(&path).unwrap(), template("comfortable"));
    }

    #[test]
    fn load_profile_rejects_bad_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        save_profile(&PreferenceProfile::new(0.9, 0.9, 0.0, 0.0, "time"), &path).unwrap();
        let err = load_profile(&path).unwrap_err();
        assert!(matches!(err, StoreError::InvalidProfile(_)));
        assert!(err.to_string().contains("1.800"));
    }
}
