//! Configuration for udpbeat
//!
//! Settings are layered from lowest to highest precedence: built-in defaults,
//! a JSON file (`~/.udpbeat/config.json`), `UDPBEAT_*` environment variables,
//! and finally command-line flags applied by the binary. The defaults send
//! `"Hello\n" x 1000` to `127.0.0.1:5000` once per second.

mod interval;
mod payload;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BeatError, Result};
use crate::heartbeat::Destination;

pub use interval::{interval_from_secs, parse_interval, validate_interval};
pub use payload::{
    Payload, PayloadConfig, PayloadEncoding, DEFAULT_PAYLOAD_REPEAT, DEFAULT_PAYLOAD_TEXT,
    MAX_DATAGRAM_LEN,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Environment variable names recognized by [`Config::apply_env_overrides`].
pub const ENV_HOST: &str = "UDPBEAT_HOST";
pub const ENV_PORT: &str = "UDPBEAT_PORT";
pub const ENV_INTERVAL: &str = "UDPBEAT_INTERVAL";
pub const ENV_PAYLOAD: &str = "UDPBEAT_PAYLOAD";
pub const ENV_REPEAT: &str = "UDPBEAT_REPEAT";

/// Heartbeat sender configuration.
///
/// # Example
///
/// ```json
/// {
///   "host": "127.0.0.1",
///   "port": 5000,
///   "interval_seconds": 1.0,
///   "payload": { "data": "Hello\n", "encoding": "text", "repeat": 1000 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Destination hostname or IP address.
    pub host: String,

    /// Destination UDP port.
    pub port: u16,

    /// Seconds between the start of consecutive sends.
    pub interval_seconds: f64,

    pub payload: PayloadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            interval_seconds: DEFAULT_INTERVAL_SECS,
            payload: PayloadConfig::default(),
        }
    }
}

impl Config {
    /// Directory holding udpbeat state (`~/.udpbeat`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".udpbeat")
    }

    /// Default config file location.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default location, falling back to defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BeatError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply `UDPBEAT_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Setting the payload data without a repeat count resets the repeat to 1,
    /// so an override is sent exactly as written.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| {
                BeatError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }
        if let Some(interval) = lookup(ENV_INTERVAL) {
            self.interval_seconds = parse_interval(&interval)?.as_secs_f64();
        }
        if let Some(data) = lookup(ENV_PAYLOAD) {
            self.payload.data = data;
            self.payload.repeat = 1;
        }
        if let Some(repeat) = lookup(ENV_REPEAT) {
            self.payload.repeat = repeat.trim().parse().map_err(|_| {
                BeatError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_REPEAT, repeat
                ))
            })?;
        }
        Ok(())
    }

    pub fn destination(&self) -> Destination {
        Destination::new(self.host.clone(), self.port)
    }

    pub fn interval(&self) -> Result<Duration> {
        interval_from_secs(self.interval_seconds)
    }

    pub fn payload(&self) -> Result<Payload> {
        self.payload.decode()
    }

    /// Check every field without resolving the destination.
    pub fn validate(&self) -> Result<()> {
        self.destination().validate()?;
        self.interval()?;
        self.payload()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_hello_to_localhost_port_5000() {
        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.interval().unwrap(), Duration::from_secs(1));
        assert_eq!(config.payload().unwrap().len(), 6000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = Config::from_json(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.payload, PayloadConfig::default());
    }

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "host": "localhost",
            "port": 6000,
            "interval_seconds": 0.25,
            "payload": { "data": "AAEC", "encoding": "base64", "repeat": 3 }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.interval().unwrap(), Duration::from_millis(250));
        assert_eq!(
            config.payload().unwrap().as_bytes(),
            &[0, 1, 2, 0, 1, 2, 0, 1, 2]
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let err = Config::from_json(r#"{"hots": "x"}"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"host": "10.0.0.1", "interval_seconds": 5}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.interval().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BeatError::Config(_)));
    }

    #[test]
    fn test_load_from_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, BeatError::Json(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup_from(&[
                (ENV_HOST, "192.168.1.20"),
                (ENV_PORT, "7000"),
                (ENV_INTERVAL, "250ms"),
            ]))
            .unwrap();
        assert_eq!(config.host, "192.168.1.20");
        assert_eq!(config.port, 7000);
        assert_eq!(config.interval().unwrap(), Duration::from_millis(250));
        assert_eq!(config.payload, PayloadConfig::default());
    }

    #[test]
    fn test_env_payload_resets_repeat() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup_from(&[(ENV_PAYLOAD, "ping")]))
            .unwrap();
        assert_eq!(config.payload().unwrap().as_bytes(), b"ping");

        config
            .apply_overrides_from(lookup_from(&[(ENV_PAYLOAD, "ab"), (ENV_REPEAT, "3")]))
            .unwrap();
        assert_eq!(config.payload().unwrap().as_bytes(), b"ababab");
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = Config::default();
        let err = config
            .apply_overrides_from(lookup_from(&[(ENV_PORT, "70000")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_PORT));
    }

    #[test]
    fn test_no_overrides_is_noop() {
        let mut config = Config::default();
        config.apply_overrides_from(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let config = Config {
            interval_seconds: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BeatError::Config(_))));

        let config = Config {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.payload.data.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_under_dir() {
        assert!(Config::path().starts_with(Config::dir()));
        assert!(Config::path().ends_with("config.json"));
    }
}
