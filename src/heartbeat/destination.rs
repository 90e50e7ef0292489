//! Destination endpoint for heartbeat datagrams.

use std::fmt;
use std::net::SocketAddr;

use serde::Serialize;

use crate::error::{BeatError, Result};

/// A (host, port) pair identifying a UDP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    host: String,
    port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Syntactic checks that need no resolver.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(BeatError::Config("Destination host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(BeatError::Config(format!(
                "Destination port for {} must be non-zero",
                self.host
            )));
        }
        Ok(())
    }

    /// Resolve to the first socket address returned by the system resolver.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        self.validate()?;

        let mut addrs = tokio::net::lookup_host((self.host.trim(), self.port))
            .await
            .map_err(|e| BeatError::Config(format!("Failed to resolve {}: {}", self, e)))?;

        addrs
            .next()
            .ok_or_else(|| BeatError::Config(format!("{} resolved to no addresses", self)))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
