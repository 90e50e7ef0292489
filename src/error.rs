//! Error types for udpbeat
//!
//! This module defines the error taxonomy used by the heartbeat sender.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.

use thiserror::Error;

/// The primary error type for udpbeat operations.
#[derive(Error, Debug)]
pub enum BeatError {
    /// Invalid destination, payload, interval, or config file. Raised before
    /// any socket is opened.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single tick failed to send. Recovered inside the send loop.
    #[error("Transient send error: {0}")]
    TransientSend(String),

    /// Socket-level failure that invalidates the sender.
    #[error("Fatal sender error: {0}")]
    Fatal(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BeatError {
    /// Taxonomy name reported on the diagnostic stream.
    pub fn kind(&self) -> &'static str {
        match self {
            BeatError::Config(_) | BeatError::Json(_) => "ConfigurationError",
            BeatError::TransientSend(_) => "TransientSendError",
            BeatError::Fatal(_) | BeatError::Io(_) => "FatalSenderError",
        }
    }

    /// Whether this error was raised before the send loop could start.
    pub fn is_config(&self) -> bool {
        matches!(self, BeatError::Config(_) | BeatError::Json(_))
    }
}

/// A specialized `Result` type for udpbeat operations.
pub type Result<T> = std::result::Result<T, BeatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BeatError::Config("payload must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: payload must not be empty"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "socket closed");
        let beat_err: BeatError = io_err.into();
        assert!(matches!(beat_err, BeatError::Io(_)));
        assert_eq!(beat_err.kind(), "FatalSenderError");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(BeatError::Config("x".into()).kind(), "ConfigurationError");
        assert_eq!(
            BeatError::TransientSend("x".into()).kind(),
            "TransientSendError"
        );
        assert_eq!(BeatError::Fatal("x".into()).kind(), "FatalSenderError");
    }

    #[test]
    fn test_json_error_is_config() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BeatError = json_err.into();
        assert!(err.is_config());
        assert!(!BeatError::Fatal("x".into()).is_config());
    }
}
