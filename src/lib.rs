//! udpbeat - periodic UDP heartbeat sender

pub mod config;
pub mod error;
pub mod heartbeat;

pub use config::Config;
pub use error::{BeatError, Result};
