//! Connection types.
//!
//! A `Connection` is a directed, weighted link between two locations.
//! A bidirectional route is two independent connections, one per direction.

use std::fmt;

use super::NetworkError;

/// The four independent cost components of a connection.
///
/// All components are non-negative by construction. Transfers are integral
/// but take part in floating-point sums like the other components.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::Costs;
///
/// let costs = Costs::new(1200.0, 6.0, 3500.0, 0).unwrap();
/// assert_eq!(costs.time(), 6.0);
///
/// assert!(Costs::new(-1.0, 6.0, 3500.0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Costs {
    distance: f64,
    time: f64,
    fare: f64,
    transfers: u32,
}

impl Costs {
    /// Validate and construct a set of costs.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidCost` naming the first component that is
    /// negative, NaN or infinite.
    pub fn new(distance: f64, time: f64, fare: f64, transfers: u32) -> Result<Self, NetworkError> {
        for (field, value) in [("distance", distance), ("time", time), ("fare", fare)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::InvalidCost { field, value });
            }
        }
        Ok(Self {
            distance,
            time,
            fare,
            transfers,
        })
    }

    /// Distance in metres.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Travel time in minutes.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Fare in the network's currency unit.
    pub fn fare(&self) -> f64 {
        self.fare
    }

    pub fn transfers(&self) -> u32 {
        self.transfers
    }
}

/// A directed, weighted edge between two named locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    source: String,
    destination: String,
    costs: Costs,
    mode: String,
}

impl Connection {
    /// Creates a connection. Endpoint existence is the owning network's concern.
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        costs: Costs,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            costs,
            mode: mode.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn costs(&self) -> &Costs {
        &self.costs
    }

    pub fn distance(&self) -> f64 {
        self.costs.distance
    }

    pub fn time(&self) -> f64 {
        self.costs.time
    }

    pub fn fare(&self) -> f64 {
        self.costs.fare
    }

    pub fn transfers(&self) -> u32 {
        self.costs.transfers
    }

    /// Free-text transport mode label (e.g. "bus", "train").
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Returns true if source and destination are the same location.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.destination
    }

    /// Replaces every cost component and the mode in one step.
    pub(crate) fn replace(&mut self, costs: Costs, mode: String) {
        self.costs = costs;
        self.mode = mode;
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}m, {}min, fare {}, {} transfers",
            self.source,
            self.destination,
            self.costs.distance,
            self.costs.time,
            self.costs.fare,
            self.costs.transfers
        )?;
        if !self.mode.is_empty() {
            write!(f, ", {}", self.mode)?;
        }
        f.write_str("]")
    }
}
