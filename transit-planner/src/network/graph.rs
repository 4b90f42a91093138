//! Network storage and CRUD operations.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::log::{Mutation, MutationLog, NoopLog};
use crate::domain::{Connection, Coordinates, Costs, Location, NetworkError};

/// A directed multi-modal transport network.
///
/// Locations are keyed by name. Connections are indexed only by their source
/// location, in insertion order, with at most one connection per ordered
/// `(source, destination)` pair.
///
/// # Invariants
///
/// - Every connection's source and destination exist as locations
/// - Removing a location removes every connection naming it
///
/// A `Network` is not synchronised. Concurrent readers are fine as long as no
/// writer is active; wrap it in a lock to share it between threads.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::Costs;
/// use transit_planner::network::Network;
///
/// let mut network = Network::new();
/// network.add_location("Gambir", -6.1767, 106.8306, Some("station")).unwrap();
/// network.add_location("Manggarai", -6.2099, 106.8502, None).unwrap();
///
/// let costs = Costs::new(4300.0, 9.0, 3000.0, 0).unwrap();
/// network.add_connection("Gambir", "Manggarai", costs, "train").unwrap();
///
/// assert_eq!(network.neighbors("Gambir"), vec!["Manggarai"]);
/// assert!(network.is_connected());
///
/// // Nothing leads to Tanah Abang from Gambir
/// network.add_location("Tanah Abang", -6.1857, 106.8110, None).unwrap();
/// assert!(!network.is_connected());
/// ```
#[derive(Clone)]
pub struct Network {
    locations: BTreeMap<String, Location>,
    adjacency: BTreeMap<String, Vec<Connection>>,
    log: Arc<dyn MutationLog>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("locations", &self.locations.len())
            .field("connections", &self.connection_count())
            .finish()
    }
}

impl Network {
    /// Create an empty network that discards mutation notifications.
    pub fn new() -> Self {
        Self::with_log(Arc::new(NoopLog))
    }

    /// Create an empty network reporting mutations to `log`.
    pub fn with_log(log: Arc<dyn MutationLog>) -> Self {
        Self {
            locations: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            log,
        }
    }

    /// Replace the mutation log.
    pub fn set_log(&mut self, log: Arc<dyn MutationLog>) {
        self.log = log;
    }

    /// Report the outcome of a mutation and pass it through.
    fn record<T>(
        &self,
        mutation: Mutation,
        subject: &str,
        result: Result<T, NetworkError>,
    ) -> Result<T, NetworkError> {
        match &result {
            Ok(_) => self.log.succeeded(mutation, subject),
            Err(e) => self.log.failed(mutation, subject, e),
        }
        result
    }

    // Locations

    /// Add a location with no connections.
    ///
    /// # Errors
    ///
    /// Fails if the name is blank or already present, or the coordinates are
    /// out of range.
    pub fn add_location(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
        category: Option<&str>,
    ) -> Result<(), NetworkError> {
        let result = self.try_add_location(name, latitude, longitude, category);
        self.record(Mutation::AddLocation, name, result)
    }

    fn try_add_location(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
        category: Option<&str>,
    ) -> Result<(), NetworkError> {
        if self.locations.contains_key(name) {
            return Err(NetworkError::DuplicateLocation(name.to_string()));
        }
        let coordinates = Coordinates::new(latitude, longitude)?;
        let location = Location::new(name, coordinates, category.map(str::to_string))?;

        self.locations.insert(name.to_string(), location);
        self.adjacency.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Remove a location and every connection naming it as source or destination.
    ///
    /// Connections are indexed by source only, so this sweeps every bucket.
    pub fn remove_location(&mut self, name: &str) -> Result<(), NetworkError> {
        let result = self.try_remove_location(name);
        self.record(Mutation::RemoveLocation, name, result)
    }

    fn try_remove_location(&mut self, name: &str) -> Result<(), NetworkError> {
        if self.locations.remove(name).is_none() {
            return Err(NetworkError::UnknownLocation(name.to_string()));
        }

        let mut removed = self.adjacency.remove(name).map_or(0, |bucket| bucket.len());
        for bucket in self.adjacency.values_mut() {
            let before = bucket.len();
            bucket.retain(|c| c.destination() != name);
            removed += before - bucket.len();
        }

        debug!(location = name, connections = removed, "removed location");
        Ok(())
    }

    /// Replace a location's coordinates and category. The name never changes.
    pub fn update_location(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
        category: Option<&str>,
    ) -> Result<(), NetworkError> {
        let result = self.try_update_location(name, latitude, longitude, category);
        self.record(Mutation::UpdateLocation, name, result)
    }

    fn try_update_location(
        &mut self,
        name: &str,
        latitude: f64,
        longitude: f64,
        category: Option<&str>,
    ) -> Result<(), NetworkError> {
        let location = self
            .locations
            .get_mut(name)
            .ok_or_else(|| NetworkError::UnknownLocation(name.to_string()))?;
        let coordinates = Coordinates::new(latitude, longitude)?;
        location.relocate(coordinates, category.map(str::to_string));
        Ok(())
    }

    /// Mark a location active or inactive. Routing ignores this flag.
    pub fn set_location_active(&mut self, name: &str, active: bool) -> Result<(), NetworkError> {
        let result = match self.locations.get_mut(name) {
            Some(location) => {
                location.set_active(active);
                Ok(())
            }
            None => Err(NetworkError::UnknownLocation(name.to_string())),
        };
        self.record(Mutation::SetLocationActive, name, result)
    }

    // Connections

    /// Add a connection from `source` to `destination`.
    ///
    /// # Errors
    ///
    /// Fails if either endpoint is missing or a connection for the ordered
    /// pair already exists. Use [`Network::update_connection`] to change one.
    pub fn add_connection(
        &mut self,
        source: &str,
        destination: &str,
        costs: Costs,
        mode: &str,
    ) -> Result<(), NetworkError> {
        let result = self.try_add_connection(source, destination, costs, mode);
        self.record(
            Mutation::AddConnection,
            &format!("{source} -> {destination}"),
            result,
        )
    }

    fn try_add_connection(
        &mut self,
        source: &str,
        destination: &str,
        costs: Costs,
        mode: &str,
    ) -> Result<(), NetworkError> {
        self.require_location(source)?;
        self.require_location(destination)?;
        if self.has_connection(source, destination) {
            return Err(NetworkError::DuplicateConnection {
                from: source.to_string(),
                to: destination.to_string(),
            });
        }

        self.adjacency
            .entry(source.to_string())
            .or_default()
            .push(Connection::new(source, destination, costs, mode));
        Ok(())
    }

    /// Replace all costs and the mode of an existing connection at once.
    pub fn update_connection(
        &mut self,
        source: &str,
        destination: &str,
        costs: Costs,
        mode: &str,
    ) -> Result<(), NetworkError> {
        let result = match self.connection_mut(source, destination) {
            Some(connection) => {
                connection.replace(costs, mode.to_string());
                Ok(())
            }
            None => Err(unknown_connection(source, destination)),
        };
        self.record(
            Mutation::UpdateConnection,
            &format!("{source} -> {destination}"),
            result,
        )
    }

    /// Remove the connection from `source` to `destination`.
    pub fn remove_connection(&mut self, source: &str, destination: &str) -> Result<(), NetworkError> {
        let result = self.try_remove_connection(source, destination);
        self.record(
            Mutation::RemoveConnection,
            &format!("{source} -> {destination}"),
            result,
        )
    }

    fn try_remove_connection(&mut self, source: &str, destination: &str) -> Result<(), NetworkError> {
        let bucket = self
            .adjacency
            .get_mut(source)
            .ok_or_else(|| unknown_connection(source, destination))?;
        let idx = bucket
            .iter()
            .position(|c| c.destination() == destination)
            .ok_or_else(|| unknown_connection(source, destination))?;
        bucket.remove(idx);
        Ok(())
    }

    /// Remove every location and connection.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.adjacency.clear();
        self.log.succeeded(Mutation::Clear, "network");
    }

    // Queries

    pub fn has_location(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn has_connection(&self, source: &str, destination: &str) -> bool {
        self.connection(source, destination).is_some()
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    pub fn connection(&self, source: &str, destination: &str) -> Option<&Connection> {
        self.outgoing_connections(source)
            .iter()
            .find(|c| c.destination() == destination)
    }

    fn connection_mut(&mut self, source: &str, destination: &str) -> Option<&mut Connection> {
        self.adjacency
            .get_mut(source)?
            .iter_mut()
            .find(|c| c.destination() == destination)
    }

    /// Destinations reachable in one hop, in insertion order.
    ///
    /// Empty if the location does not exist.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        self.outgoing_connections(name)
            .iter()
            .map(Connection::destination)
            .collect()
    }

    /// Outgoing connections in insertion order. Empty if the location does not exist.
    pub fn outgoing_connections(&self, name: &str) -> &[Connection] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn connection_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// All location names in ascending order.
    pub fn all_location_names(&self) -> Vec<&str> {
        self.locations.keys().map(String::as_str).collect()
    }

    /// All locations in ascending name order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// All connections, grouped by source in ascending name order and in
    /// insertion order within a source.
    pub fn all_connections(&self) -> impl Iterator<Item = &Connection> {
        self.adjacency.values().flatten()
    }

    /// Other locations within `radius_m` metres of `name`, nearest first.
    ///
    /// Empty if the location does not exist.
    pub fn locations_within(&self, name: &str, radius_m: f64) -> Vec<&str> {
        let Some(center) = self.locations.get(name) else {
            return Vec::new();
        };

        let mut nearby: Vec<(&str, f64)> = self
            .locations
            .values()
            .filter(|loc| loc.name() != name)
            .map(|loc| (loc.name(), center.distance_to(loc)))
            .filter(|(_, d)| *d <= radius_m)
            .collect();
        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));
        nearby.into_iter().map(|(n, _)| n).collect()
    }

    /// True iff every location is reachable from the first location (by name)
    /// along outgoing connections.
    ///
    /// This is one-directional reachability from a single root, not strong
    /// connectivity: a sink that nothing leads to makes this false even if the
    /// sink itself can reach everything. An empty network is connected.
    pub fn is_connected(&self) -> bool {
        let Some(root) = self.locations.keys().next().map(String::as_str) else {
            return true;
        };

        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(root);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited.len() == self.locations.len()
    }

    fn require_location(&self, name: &str) -> Result<(), NetworkError> {
        if self.has_location(name) {
            Ok(())
        } else {
            Err(NetworkError::UnknownLocation(name.to_string()))
        }
    }
}

fn unknown_connection(source: &str, destination: &str) -> NetworkError {
    NetworkError::UnknownConnection {
        from: source.to_string(),
        to: destination.to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

    /// Strategy for a list of (source, destination) index pairs.
    fn edges() -> impl Strategy<Value = Vec<(usize, usize)>> {
        proptest::collection::vec((0..NAMES.len(), 0..NAMES.len()), 0..30)
    }

    fn build(edges: &[(usize, usize)]) -> Network {
        let mut network = Network::new();
        for name in NAMES {
            network.add_location(name, 0.0, 0.0, None).unwrap();
        }
        for &(s, d) in edges {
            // Duplicates are rejected, which is fine here
            let _ = network.add_connection(NAMES[s], NAMES[d], Costs::default(), "");
        }
        network
    }

    proptest! {
        /// Removal drops exactly the connections naming the location
        #[test]
        fn removal_drops_incident_connections(edges in edges(), victim in 0..NAMES.len()) {
            let mut network = build(&edges);
            let name = NAMES[victim];
            let incident = network
                .all_connections()
                .filter(|c| c.source() == name || c.destination() == name)
                .count();
            let before = network.connection_count();

            network.remove_location(name).unwrap();

            prop_assert_eq!(network.connection_count(), before - incident);
            prop_assert!(network
                .all_connections()
                .all(|c| network.has_location(c.source()) && network.has_location(c.destination())));
        }

        /// At most one connection per ordered pair
        #[test]
        fn pairs_are_unique(edges in edges()) {
            let network = build(&edges);
            let mut seen = HashSet::new();
            for c in network.all_connections() {
                prop_assert!(seen.insert((c.source().to_string(), c.destination().to_string())));
            }
        }

        /// A failed removal never changes the network
        #[test]
        fn failed_removal_is_inert(edges in edges(), s in 0..NAMES.len(), d in 0..NAMES.len()) {
            let mut network = build(&edges);
            let _ = network.remove_connection(NAMES[s], NAMES[d]);
            let count = network.connection_count();
            prop_assert!(network.remove_connection(NAMES[s], NAMES[d]).is_err());
            prop_assert_eq!(network.connection_count(), count);
        }
    }
}
