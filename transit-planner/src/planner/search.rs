//! Dijkstra shortest path search.
//!
//! Finds the cheapest route between two locations under a pluggable edge
//! weight. An unreachable destination is an ordinary outcome: the result is
//! marked invalid rather than returned as an error.

use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;
use tracing::{debug, trace};

use super::criterion::Criterion;
use super::rank::{deduplicate, rank_routes};
use super::state::State;
use crate::domain::Connection;
use crate::network::Network;
use crate::preferences::PreferenceProfile;

/// Outcome of a route search.
///
/// A valid result has a path from origin to destination inclusive and the
/// summed cost components of the connections along it. An invalid result has
/// an empty path and zero totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    path: Vec<String>,
    total_distance: f64,
    total_time: f64,
    total_fare: f64,
    total_transfers: u32,
    criterion: String,
    valid: bool,
}

impl RouteResult {
    /// An invalid result: no route was found.
    pub fn unreachable(criterion: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            total_distance: 0.0,
            total_time: 0.0,
            total_fare: 0.0,
            total_transfers: 0,
            criterion: criterion.into(),
            valid: false,
        }
    }

    /// Build a valid result from the origin and the connections taken in order.
    fn from_connections(origin: &str, hops: &[&Connection], criterion: &str) -> Self {
        let mut path = Vec::with_capacity(hops.len() + 1);
        path.push(origin.to_string());

        let mut result = Self {
            path: Vec::new(),
            total_distance: 0.0,
            total_time: 0.0,
            total_fare: 0.0,
            total_transfers: 0,
            criterion: criterion.to_string(),
            valid: true,
        };

        for hop in hops {
            path.push(hop.destination().to_string());
            result.total_distance += hop.distance();
            result.total_time += hop.time();
            result.total_fare += hop.fare();
            result.total_transfers += hop.transfers();
        }

        result.path = path;
        result
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Location names from origin to destination inclusive. Empty if invalid.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn origin(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn destination(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Number of connections travelled.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn total_fare(&self) -> f64 {
        self.total_fare
    }

    pub fn total_transfers(&self) -> u32 {
        self.total_transfers
    }

    /// Name of the criterion the route was optimised for.
    pub fn criterion(&self) -> &str {
        &self.criterion
    }

    /// The route's cost under `criterion`, computed from its totals.
    pub fn cost(&self, criterion: &Criterion) -> f64 {
        criterion.apply(
            self.total_distance,
            self.total_time,
            self.total_fare,
            f64::from(self.total_transfers),
        )
    }
}

/// Find the cheapest route from `origin` to `destination` under `criterion`.
///
/// Shorthand for `RouteFinder::new(network).find_route(..)`.
pub fn find_route(
    network: &Network,
    origin: &str,
    destination: &str,
    criterion: &Criterion,
) -> RouteResult {
    RouteFinder::new(network).find_route(origin, destination, criterion)
}

/// Shortest path queries against a network.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::Costs;
/// use transit_planner::network::Network;
/// use transit_planner::planner::{Criterion, RouteFinder};
///
/// let mut network = Network::new();
/// for name in ["P", "Q", "R"] {
///     network.add_location(name, 0.0, 0.0, None).unwrap();
/// }
/// network.add_connection("P", "Q", Costs::new(1000.0, 10.0, 5000.0, 0).unwrap(), "bus").unwrap();
/// network.add_connection("Q", "R", Costs::new(4500.0, 20.0, 3000.0, 0).unwrap(), "bus").unwrap();
/// network.add_connection("P", "R", Costs::new(5000.0, 45.0, 1000.0, 1).unwrap(), "train").unwrap();
///
/// let finder = RouteFinder::new(&network);
///
/// let by_time = finder.find_route("P", "R", &Criterion::Time);
/// assert_eq!(by_time.path(), ["P", "Q", "R"]);
/// assert_eq!(by_time.total_time(), 30.0);
///
/// let by_distance = finder.find_route("P", "R", &Criterion::Distance);
/// assert_eq!(by_distance.path(), ["P", "R"]);
/// assert_eq!(by_distance.total_distance(), 5000.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteFinder<'a> {
    network: &'a Network,
}

impl<'a> RouteFinder<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }

    /// Find the cheapest route under one of the criteria.
    pub fn find_route(&self, origin: &str, destination: &str, criterion: &Criterion) -> RouteResult {
        self.find_route_by(origin, destination, criterion.name(), |c| criterion.weight(c))
    }

    /// Find the cheapest route under a profile's weighted blend.
    pub fn find_route_with_profile(
        &self,
        origin: &str,
        destination: &str,
        profile: &PreferenceProfile,
    ) -> RouteResult {
        self.find_route(origin, destination, &Criterion::Weighted(profile.clone()))
    }

    /// Find the cheapest route under an arbitrary edge weight.
    ///
    /// `weight` must return non-negative values; optimality is not guaranteed
    /// otherwise. `label` is recorded as the result's criterion name.
    ///
    /// Ties in tentative cost are broken by queue order, so among several
    /// equally cheap routes any one may be returned.
    ///
    /// # Panics
    ///
    /// Panics if the network holds a connection to a location it does not
    /// contain. The network's own operations never allow that state.
    pub fn find_route_by<F>(&self, origin: &str, destination: &str, label: &str, weight: F) -> RouteResult
    where
        F: Fn(&Connection) -> f64,
    {
        let names = self.network.all_location_names();
        let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

        let (Some(&start), Some(&target)) = (index.get(origin), index.get(destination)) else {
            debug!(origin, destination, "route endpoint not in network");
            return RouteResult::unreachable(label);
        };

        let n = names.len();
        let mut best = vec![f64::INFINITY; n];
        let mut via: Vec<Option<&Connection>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        best[start] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: start,
        });

        let mut reached = false;
        while let Some(State { cost, node }) = heap.pop() {
            // Only a popped destination is final; a discovered one may still improve
            if node == target {
                reached = true;
                break;
            }

            // Stale entry
            if settled[node] || cost > best[node] {
                continue;
            }
            settled[node] = true;

            for connection in self.network.outgoing_connections(names[node]) {
                let next = match index.get(connection.destination()) {
                    Some(&idx) => idx,
                    None => panic!(
                        "connection {} -> {} names a location missing from the network",
                        connection.source(),
                        connection.destination()
                    ),
                };

                let next_cost = cost + weight(connection);
                if next_cost < best[next] {
                    best[next] = next_cost;
                    via[next] = Some(connection);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
            }
        }

        if !reached {
            debug!(origin, destination, criterion = label, "no route found");
            return RouteResult::unreachable(label);
        }

        // Walk predecessors back from the destination
        let mut hops: Vec<&Connection> = Vec::new();
        let mut current = target;
        while current != start {
            let Some(connection) = via[current] else {
                panic!("no predecessor recorded for {}", names[current]);
            };
            assert!(
                hops.len() < n,
                "predecessor chain from {destination} does not reach {origin}; \
                 the weight function returned a negative cost"
            );
            hops.push(connection);
            current = index[connection.source()];
        }
        hops.reverse();

        trace!(
            origin,
            destination,
            criterion = label,
            cost = best[target],
            hops = hops.len(),
            "route found"
        );

        RouteResult::from_connections(origin, &hops, label)
    }

    /// Routes under each built-in criterion, best first.
    ///
    /// Tries time, distance, fare and transfers in turn, drops unreachable
    /// results and routes whose path repeats an earlier one, ranks the rest
    /// and keeps at most `max`.
    pub fn alternatives(&self, origin: &str, destination: &str, max: usize) -> Vec<RouteResult> {
        let found: Vec<RouteResult> = Criterion::builtins()
            .iter()
            .map(|c| self.find_route(origin, destination, c))
            .filter(RouteResult::is_valid)
            .collect();

        let mut routes = rank_routes(deduplicate(found));
        routes.truncate(max);
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Costs;
    use crate::preferences::{Answers, DecisionTree, template};

    fn costs(distance: f64, time: f64, fare: f64, transfers: u32) -> Costs {
        Costs::new(distance, time, fare, transfers).unwrap()
    }

    /// P→Q→R is fastest, P→R is shortest and cheapest.
    fn pqr() -> Network {
        let mut network = Network::new();
        for name in ["P", "Q", "R"] {
            network.add_location(name, 0.0, 0.0, None).unwrap();
        }
        network
            .add_connection("P", "Q", costs(1000.0, 10.0, 5000.0, 0), "bus")
            .unwrap();
        network
            .add_connection("Q", "R", costs(4500.0, 20.0, 3000.0, 0), "bus")
            .unwrap();
        network
            .add_connection("P", "R", costs(5000.0, 45.0, 1000.0, 1), "train")
            .unwrap();
        network
    }

    #[test]
    fn fastest_route_goes_via_q() {
        let network = pqr();
        let result = find_route(&network, "P", "R", &Criterion::Time);

        assert!(result.is_valid());
        assert_eq!(result.path(), ["P", "Q", "R"]);
        assert_eq!(result.total_time(), 30.0);
        assert_eq!(result.total_distance(), 5500.0);
        assert_eq!(result.total_fare(), 8000.0);
        assert_eq!(result.total_transfers(), 0);
        assert_eq!(result.criterion(), "time");
    }

    #[test]
    fn shortest_route_is_direct() {
        let network = pqr();
        let result = find_route(&network, "P", "R", &Criterion::Distance);

        assert!(result.is_valid());
        assert_eq!(result.path(), ["P", "R"]);
        assert_eq!(result.total_distance(), 5000.0);
        assert_eq!(result.total_time(), 45.0);
        assert_eq!(result.total_transfers(), 1);
    }

    #[test]
    fn cheapest_and_fewest_transfers() {
        let network = pqr();

        let fare = find_route(&network, "P", "R", &Criterion::Fare);
        assert_eq!(fare.path(), ["P", "R"]);
        assert_eq!(fare.total_fare(), 1000.0);

        let transfers = find_route(&network, "P", "R", &Criterion::Transfers);
        assert_eq!(transfers.path(), ["P", "Q", "R"]);
        assert_eq!(transfers.total_transfers(), 0);
    }

    #[test]
    fn each_criterion_takes_its_own_optimum() {
        // The direct link is both faster (15 < 30) and longer (5000 > 3000)
        let mut network = Network::new();
        for name in ["P", "Q", "R"] {
            network.add_location(name, 0.0, 0.0, None).unwrap();
        }
        network.add_connection("P", "Q", costs(1000.0, 10.0, 5000.0, 0), "bus").unwrap();
        network.add_connection("Q", "R", costs(2000.0, 20.0, 3000.0, 0), "bus").unwrap();
        network.add_connection("P", "R", costs(5000.0, 15.0, 1000.0, 1), "train").unwrap();

        let by_time = find_route(&network, "P", "R", &Criterion::Time);
        assert_eq!(by_time.path(), ["P", "R"]);
        assert_eq!(by_time.total_time(), 15.0);

        let by_distance = find_route(&network, "P", "R", &Criterion::Distance);
        assert_eq!(by_distance.path(), ["P", "Q", "R"]);
        assert_eq!(by_distance.total_distance(), 3000.0);
        assert_eq!(by_distance.total_time(), 30.0);
    }

    #[test]
    fn unrecognised_criterion_name_behaves_like_time() {
        let network = pqr();
        let result = find_route(&network, "P", "R", &Criterion::resolve("scenic"));
        assert_eq!(result.path(), ["P", "Q", "R"]);
        assert_eq!(result.criterion(), "time");
    }

    #[test]
    fn unknown_destination_is_invalid() {
        let network = pqr();
        let result = find_route(&network, "P", "X", &Criterion::Time);

        assert!(!result.is_valid());
        assert!(result.path().is_empty());
        assert_eq!(result.total_time(), 0.0);
        assert_eq!(result.total_distance(), 0.0);
        assert_eq!(result.total_fare(), 0.0);
        assert_eq!(result.total_transfers(), 0);
        assert_eq!(result.origin(), None);
    }

    #[test]
    fn unknown_origin_is_invalid() {
        let network = pqr();
        assert!(!find_route(&network, "X", "R", &Criterion::Time).is_valid());
    }

    #[test]
    fn unreachable_destination_is_invalid() {
        let network = pqr();
        // Connections only run away from P
        let result = find_route(&network, "R", "P", &Criterion::Time);
        assert!(!result.is_valid());
        assert!(result.path().is_empty());
    }

    #[test]
    fn origin_equals_destination() {
        let network = pqr();
        for criterion in Criterion::builtins() {
            let result = find_route(&network, "Q", "Q", &criterion);
            assert!(result.is_valid());
            assert_eq!(result.path(), ["Q"]);
            assert_eq!(result.hop_count(), 0);
            assert_eq!(result.total_time(), 0.0);
            assert_eq!(result.total_distance(), 0.0);
            assert_eq!(result.total_fare(), 0.0);
            assert_eq!(result.total_transfers(), 0);
        }
    }

    #[test]
    fn unknown_location_to_itself_is_invalid() {
        let network = pqr();
        assert!(!find_route(&network, "X", "X", &Criterion::Time).is_valid());
    }

    #[test]
    fn self_loop_is_never_taken() {
        let mut network = pqr();
        network.add_connection("Q", "Q", costs(0.0, 0.0, 0.0, 0), "").unwrap();
        let result = find_route(&network, "P", "R", &Criterion::Time);
        assert_eq!(result.path(), ["P", "Q", "R"]);
    }

    #[test]
    fn search_does_not_mutate_network() {
        let network = pqr();
        let before = (network.location_count(), network.connection_count());
        let _ = find_route(&network, "P", "R", &Criterion::Time);
        assert_eq!(before, (network.location_count(), network.connection_count()));
    }

    #[test]
    fn stale_queue_entries_are_skipped() {
        // B is first discovered at cost 10 via A→B, then improved to 2 via C.
        let mut network = Network::new();
        for name in ["A", "B", "C", "D"] {
            network.add_location(name, 0.0, 0.0, None).unwrap();
        }
        network.add_connection("A", "B", costs(0.0, 10.0, 0.0, 0), "").unwrap();
        network.add_connection("A", "C", costs(0.0, 1.0, 0.0, 0), "").unwrap();
        network.add_connection("C", "B", costs(0.0, 1.0, 0.0, 0), "").unwrap();
        network.add_connection("B", "D", costs(0.0, 1.0, 0.0, 0), "").unwrap();

        let result = find_route(&network, "A", "D", &Criterion::Time);
        assert_eq!(result.path(), ["A", "C", "B", "D"]);
        assert_eq!(result.total_time(), 3.0);
    }

    #[test]
    fn weighted_profile() {
        let network = pqr();
        let finder = RouteFinder::new(&network);

        // Fare dominates: direct train wins
        let cheapest = finder.find_route_with_profile("P", "R", &template("cheapest"));
        assert_eq!(cheapest.path(), ["P", "R"]);
        assert_eq!(cheapest.criterion(), "weighted");

        // Time only: via Q
        let time_only = PreferenceProfile::new(1.0, 0.0, 0.0, 0.0, "time");
        let fastest = finder.find_route_with_profile("P", "R", &time_only);
        assert_eq!(fastest.path(), ["P", "Q", "R"]);
    }

    #[test]
    fn tree_derived_profile_is_accepted() {
        let network = pqr();
        let answers: Answers = [("budget_concern".to_string(), 1.0), ("speed_priority".to_string(), 4.0)]
            .into_iter()
            .collect();
        let profile = DecisionTree::standard().evaluate(&answers);

        let result = RouteFinder::new(&network).find_route_with_profile("P", "R", &profile);
        assert!(result.is_valid());
        // 0.4 time + 0.1 distance + 0.4 fare + 0.1 transfers favours the cheap direct link
        assert_eq!(result.path(), ["P", "R"]);
    }

    #[test]
    fn custom_weight_function() {
        let network = pqr();
        let finder = RouteFinder::new(&network);
        // Count hops
        let result = finder.find_route_by("P", "R", "hops", |_| 1.0);
        assert_eq!(result.path(), ["P", "R"]);
        assert_eq!(result.criterion(), "hops");
    }

    #[test]
    fn cost_under_criterion() {
        let network = pqr();
        let result = find_route(&network, "P", "R", &Criterion::Time);
        assert_eq!(result.cost(&Criterion::Time), 30.0);
        assert_eq!(result.cost(&Criterion::Distance), 5500.0);
        assert_eq!(result.cost(&Criterion::Fare), 8000.0);
        assert_eq!(result.cost(&Criterion::Transfers), 0.0);
    }

    #[test]
    fn alternatives_are_distinct_and_ranked() {
        let network = pqr();
        let routes = RouteFinder::new(&network).alternatives("P", "R", 4);

        assert_eq!(routes.len(), 2);
        // Ranked by total time
        assert_eq!(routes[0].path(), ["P", "Q", "R"]);
        assert_eq!(routes[1].path(), ["P", "R"]);
    }

    #[test]
    fn alternatives_respect_max() {
        let network = pqr();
        let routes = RouteFinder::new(&network).alternatives("P", "R", 1);
        assert_eq!(routes.len(), 1);
        assert!(RouteFinder::new(&network).alternatives("R", "P", 4).is_empty());
    }
}
