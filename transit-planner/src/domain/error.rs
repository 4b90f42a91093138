//! Domain error types.
//!
//! These errors represent validation failures and lookups of missing
//! entities when mutating a network. They are returned, never panicked.

/// Errors returned by fallible constructors and network mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// Location names are identity keys and may not be blank
    #[error("location name must not be empty")]
    EmptyName,

    /// Latitude outside [-90, 90] or longitude outside [-180, 180]
    #[error("invalid coordinates: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// A cost component is negative or not a finite number
    #[error("invalid {field}: {value} (must be a non-negative number)")]
    InvalidCost { field: &'static str, value: f64 },

    /// A location with this name already exists
    #[error("location {0} already exists")]
    DuplicateLocation(String),

    /// No location with this name exists
    #[error("location {0} does not exist")]
    UnknownLocation(String),

    /// A connection for this ordered pair already exists
    #[error("connection {from} -> {to} already exists")]
    DuplicateConnection { from: String, to: String },

    /// No connection for this ordered pair exists
    #[error("connection {from} -> {to} does not exist")]
    UnknownConnection { from: String, to: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            NetworkError::EmptyName.to_string(),
            "location name must not be empty"
        );

        let err = NetworkError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert_eq!(err.to_string(), "invalid coordinates: (91, 0)");

        let err = NetworkError::InvalidCost {
            field: "fare",
            value: -1.5,
        };
        assert_eq!(
            err.to_string(),
            "invalid fare: -1.5 (must be a non-negative number)"
        );

        let err = NetworkError::DuplicateLocation("Central".into());
        assert_eq!(err.to_string(), "location Central already exists");

        let err = NetworkError::UnknownLocation("Harbour".into());
        assert_eq!(err.to_string(), "location Harbour does not exist");

        let err = NetworkError::DuplicateConnection {
            from: "A".into(),
            to: "B".into(),
        };
        assert_eq!(err.to_string(), "connection A -> B already exists");

        let err = NetworkError::UnknownConnection {
            from: "A".into(),
            to: "B".into(),
        };
        assert_eq!(err.to_string(), "connection A -> B does not exist");
    }
}
