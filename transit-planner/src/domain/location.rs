//! Location types.

use std::fmt;

use super::NetworkError;

/// Mean Earth radius in metres, used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
/// Out-of-range values are rejected, never clamped.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::Coordinates;
///
/// let c = Coordinates::new(-6.2, 106.8).unwrap();
/// assert_eq!(c.latitude(), -6.2);
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// assert!(Coordinates::new(0.0, -180.5).is_err());
/// assert!(Coordinates::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and construct a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, NetworkError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(NetworkError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Initial bearing towards `other`, in degrees within [0, 360).
    pub fn bearing_to(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A named point in the network: a station, stop or hub.
///
/// The name is the identity key and never changes after construction.
/// Coordinates and category can be replaced through the owning network.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    coordinates: Coordinates,
    category: Option<String>,
    active: bool,
}

impl Location {
    /// Creates an active location.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::EmptyName` if the name is blank.
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        category: Option<String>,
    ) -> Result<Self, NetworkError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NetworkError::EmptyName);
        }
        Ok(Self {
            name,
            coordinates,
            category,
            active: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Great-circle distance to another location in metres.
    pub fn distance_to(&self, other: &Location) -> f64 {
        self.coordinates.distance_to(&other.coordinates)
    }

    /// Initial bearing to another location in degrees.
    pub fn bearing_to(&self, other: &Location) -> f64 {
        self.coordinates.bearing_to(&other.coordinates)
    }

    /// Returns true if `other` lies within `radius_m` metres.
    pub fn is_within_radius(&self, other: &Location, radius_m: f64) -> bool {
        self.distance_to(other) <= radius_m
    }

    pub(crate) fn relocate(&mut self, coordinates: Coordinates, category: Option<String>) {
        self.coordinates = coordinates;
        self.category = category;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.coordinates)
    }
}
