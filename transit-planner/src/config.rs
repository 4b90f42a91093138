//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "TRANSIT_PLANNER_CONFIG";
/// Environment variable overriding the bind address.
pub const ADDR_ENV: &str = "TRANSIT_PLANNER_ADDR";
/// Environment variable overriding the CSV network file.
pub const NETWORK_ENV: &str = "TRANSIT_PLANNER_NETWORK";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid bind address: {0}")]
    InvalidAddress(String),
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// CSV file of connections loaded at start-up.
    pub network_file: Option<PathBuf>,

    /// JSON network snapshot loaded at start-up. Takes precedence over
    /// `network_file` when both are set.
    pub snapshot_file: Option<PathBuf>,

    /// Criterion used when a route request names none.
    pub default_criterion: String,

    /// How many route searches to remember.
    pub history_capacity: usize,

    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl AppConfig {
    /// Read configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Build configuration from the process environment.
    ///
    /// Starts from the file named by `TRANSIT_PLANNER_CONFIG` if set, otherwise
    /// from defaults, then applies `TRANSIT_PLANNER_ADDR` and
    /// `TRANSIT_PLANNER_NETWORK`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(addr) = lookup(ADDR_ENV) {
            self.bind_addr = addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(addr.clone()))?;
        }
        if let Some(path) = lookup(NETWORK_ENV) {
            self.network_file = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_network_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.network_file = Some(path.into());
        self
    }

    pub fn with_snapshot_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_file = Some(path.into());
        self
    }

    pub fn with_default_criterion(mut self, criterion: impl Into<String>) -> Self {
        self.default_criterion = criterion.into();
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            network_file: None,
            snapshot_file: None,
            default_criterion: "time".to_string(),
            history_capacity: 50,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.network_file, None);
        assert_eq!(config.default_criterion, "time");
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn builders() {
        let config = AppConfig::default()
            .with_network_file("net.csv")
            .with_snapshot_file("net.json")
            .with_default_criterion("distance")
            .with_history_capacity(5);
        assert_eq!(config.network_file, Some(PathBuf::from("net.csv")));
        assert_eq!(config.snapshot_file, Some(PathBuf::from("net.json")));
        assert_eq!(config.default_criterion, "distance");
        assert_eq!(config.history_capacity, 5);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "history_capacity": 10, "default_criterion": "fare" }"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.default_criterion, "fare");
        assert_eq!(config.bind_addr, AppConfig::default().bind_addr);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ bind_addr: ").unwrap();
        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "bind_addr": "0.0.0.0:8080", "network_file": "a.csv" }"#,
        )
        .unwrap();
        let path = path.to_string_lossy().into_owned();

        let config = AppConfig::from_lookup(lookup(&[
            (CONFIG_ENV, path.as_str()),
            (NETWORK_ENV, "b.csv"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.network_file, Some(PathBuf::from("b.csv")));

        let config = AppConfig::from_lookup(lookup(&[(ADDR_ENV, "127.0.0.1:9999")])).unwrap();
        assert_eq!(config.bind_addr.port(), 9999);
    }

    #[test]
    fn invalid_address_override() {
        let err = AppConfig::from_lookup(lookup(&[(ADDR_ENV, "not an address")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid bind address: not an address");
    }
}
