//! Heartbeat payload and its configured encoding.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{BeatError, Result};

/// Largest UDP payload that fits in a single IPv4 datagram.
pub const MAX_DATAGRAM_LEN: usize = 65_507;

/// Default payload text, repeated [`DEFAULT_PAYLOAD_REPEAT`] times.
pub const DEFAULT_PAYLOAD_TEXT: &str = "Hello\n";

/// Default repeat count, giving a 6000-byte datagram.
pub const DEFAULT_PAYLOAD_REPEAT: usize = 1000;

/// Immutable datagram body sent unchanged on every tick.
///
/// Always non-empty and no larger than [`MAX_DATAGRAM_LEN`]. Cloning is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    /// Wrap raw bytes, rejecting empty or oversized payloads.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(BeatError::Config("Payload must not be empty".into()));
        }
        if bytes.len() > MAX_DATAGRAM_LEN {
            return Err(BeatError::Config(format!(
                "Payload is {} bytes, larger than the maximum UDP datagram ({} bytes)",
                bytes.len(),
                MAX_DATAGRAM_LEN
            )));
        }
        Ok(Self(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload").field("len", &self.0.len()).finish()
    }
}

/// How `PayloadConfig::data` is turned into bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// UTF-8 bytes of the string as written.
    #[default]
    Text,
    Hex,
    Base64,
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadEncoding::Text => write!(f, "text"),
            PayloadEncoding::Hex => write!(f, "hex"),
            PayloadEncoding::Base64 => write!(f, "base64"),
        }
    }
}

impl FromStr for PayloadEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(PayloadEncoding::Text),
            "hex" => Ok(PayloadEncoding::Hex),
            "base64" => Ok(PayloadEncoding::Base64),
            other => Err(format!(
                "unknown payload encoding '{}' (expected text, hex or base64)",
                other
            )),
        }
    }
}

/// Payload section of the config file.
///
/// # Example
///
/// ```json
/// { "data": "48656c6c6f0a", "encoding": "hex", "repeat": 1000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayloadConfig {
    /// Payload unit, interpreted according to `encoding`.
    pub data: String,

    pub encoding: PayloadEncoding,

    /// Number of times the decoded unit is repeated. Must be at least 1.
    pub repeat: usize,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            data: DEFAULT_PAYLOAD_TEXT.to_string(),
            encoding: PayloadEncoding::Text,
            repeat: DEFAULT_PAYLOAD_REPEAT,
        }
    }
}

impl PayloadConfig {
    /// Decode `data` and repeat it into the final datagram body.
    pub fn decode(&self) -> Result<Payload> {
        if self.repeat == 0 {
            return Err(BeatError::Config("Payload repeat must be at least 1".into()));
        }

        let unit = match self.encoding {
            PayloadEncoding::Text => self.data.as_bytes().to_vec(),
            PayloadEncoding::Hex => hex::decode(self.data.trim())
                .map_err(|e| BeatError::Config(format!("Invalid hex payload: {}", e)))?,
            PayloadEncoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(self.data.trim())
                .map_err(|e| BeatError::Config(format!("Invalid base64 payload: {}", e)))?,
        };

        // Check the size before allocating the repeated buffer.
        match unit.len().checked_mul(self.repeat) {
            Some(total) if total <= MAX_DATAGRAM_LEN => Payload::new(unit.repeat(self.repeat)),
            _ => Err(BeatError::Config(format!(
                "Payload of {} bytes x {} exceeds the maximum UDP datagram ({} bytes)",
                unit.len(),
                self.repeat,
                MAX_DATAGRAM_LEN
            ))),
        }
    }
}
