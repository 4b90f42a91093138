//! Cost criteria for route finding.

use std::fmt;

use crate::domain::Connection;
use crate::preferences::PreferenceProfile;

/// The cost dimension used to weight connections during a search.
///
/// Every built-in criterion yields non-negative weights, since connection
/// costs are non-negative by construction. A weighted criterion is only
/// non-negative if its profile's weights are.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Criterion {
    Distance,
    #[default]
    Time,
    Fare,
    Transfers,
    /// Linear blend of all four components using the profile's weights.
    Weighted(PreferenceProfile),
}

impl Criterion {
    /// The four single-component criteria, in the order alternatives are tried.
    pub fn builtins() -> [Criterion; 4] {
        [
            Criterion::Time,
            Criterion::Distance,
            Criterion::Fare,
            Criterion::Transfers,
        ]
    }

    /// Look up a built-in criterion by name.
    ///
    /// Matching is case-insensitive and "cost" is accepted for fare.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "distance" => Some(Criterion::Distance),
            "time" => Some(Criterion::Time),
            "fare" | "cost" => Some(Criterion::Fare),
            "transfers" => Some(Criterion::Transfers),
            _ => None,
        }
    }

    /// Like [`Criterion::from_name`], but unrecognised names fall back to time.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_planner::planner::Criterion;
    ///
    /// assert_eq!(Criterion::resolve("distance"), Criterion::Distance);
    /// assert_eq!(Criterion::resolve("cost"), Criterion::Fare);
    /// assert_eq!(Criterion::resolve("scenic"), Criterion::Time);
    /// ```
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Criterion::Time)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Distance => "distance",
            Criterion::Time => "time",
            Criterion::Fare => "fare",
            Criterion::Transfers => "transfers",
            Criterion::Weighted(_) => "weighted",
        }
    }

    /// Edge weight of a connection under this criterion.
    pub fn weight(&self, connection: &Connection) -> f64 {
        self.apply(
            connection.distance(),
            connection.time(),
            connection.fare(),
            f64::from(connection.transfers()),
        )
    }

    /// Cost of a set of component values under this criterion.
    ///
    /// Every criterion is linear, so this gives the same answer for a route's
    /// totals as summing [`Criterion::weight`] over its connections.
    pub fn apply(&self, distance: f64, time: f64, fare: f64, transfers: f64) -> f64 {
        match self {
            Criterion::Distance => distance,
            Criterion::Time => time,
            Criterion::Fare => fare,
            Criterion::Transfers => transfers,
            Criterion::Weighted(p) => {
                time * p.time_weight
                    + distance * p.distance_weight
                    + fare * p.fare_weight
                    + transfers * p.transfer_weight
            }
        }
    }
}

impl From<PreferenceProfile> for Criterion {
    fn from(profile: PreferenceProfile) -> Self {
        Criterion::Weighted(profile)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Costs;
    use crate::preferences::template;

    fn connection() -> Connection {
        Connection::new("A", "B", Costs::new(1000.0, 10.0, 5000.0, 2).unwrap(), "bus")
    }

    #[test]
    fn from_name() {
        assert_eq!(Criterion::from_name("distance"), Some(Criterion::Distance));
        assert_eq!(Criterion::from_name("Time"), Some(Criterion::Time));
        assert_eq!(Criterion::from_name(" fare "), Some(Criterion::Fare));
        assert_eq!(Criterion::from_name("cost"), Some(Criterion::Fare));
        assert_eq!(Criterion::from_name("transfers"), Some(Criterion::Transfers));
        assert_eq!(Criterion::from_name("weighted"), None);
        assert_eq!(Criterion::from_name(""), None);
    }

    #[test]
    fn unknown_name_resolves_to_time() {
        assert_eq!(Criterion::resolve("composite"), Criterion::Time);
        assert_eq!(Criterion::resolve(""), Criterion::Time);
        assert_eq!(Criterion::default(), Criterion::Time);
    }

    #[test]
    fn single_component_weights() {
        let c = connection();
        assert_eq!(Criterion::Distance.weight(&c), 1000.0);
        assert_eq!(Criterion::Time.weight(&c), 10.0);
        assert_eq!(Criterion::Fare.weight(&c), 5000.0);
        assert_eq!(Criterion::Transfers.weight(&c), 2.0);
    }

    #[test]
    fn weighted_is_linear_blend() {
        let c = connection();
        let profile = PreferenceProfile::new(0.5, 0.1, 0.2, 0.2, "mix");
        assert_eq!(
            Criterion::Weighted(profile).weight(&c),
            5.0 + 100.0 + 1000.0 + 0.4
        );
    }

    #[test]
    fn weighted_with_unit_weight_isolates_component() {
        let c = connection();
        let time_only = PreferenceProfile::new(1.0, 0.0, 0.0, 0.0, "time");
        assert_eq!(Criterion::from(time_only).weight(&c), 10.0);
    }

    #[test]
    fn names_and_display() {
        assert_eq!(Criterion::Fare.name(), "fare");
        assert_eq!(Criterion::Weighted(template("balanced")).to_string(), "weighted");
        for c in Criterion::builtins() {
            assert_eq!(Criterion::from_name(c.name()), Some(c.clone()));
        }
    }
}
