//! CLI command handlers and shared flag handling.

pub(crate) mod check;
pub(crate) mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use udpbeat::config::{parse_interval, PayloadEncoding};
use udpbeat::{BeatError, Config};

/// Exit code for a fatal sender error or any unclassified failure.
pub(crate) const EXIT_FATAL: u8 = 1;
/// Exit code for a configuration error.
pub(crate) const EXIT_CONFIG: u8 = 2;

/// Flags shared by `run` and `check`. Each one overrides the config file
/// and `UDPBEAT_*` environment variables.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SenderArgs {
    /// Path to a JSON config file (default: ~/.udpbeat/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Destination hostname or IP address
    #[arg(long)]
    pub host: Option<String>,

    /// Destination UDP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interval between sends, e.g. 500ms, 1s, 2m (bare numbers are seconds)
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Payload data; repeat resets to 1 unless --repeat is given
    #[arg(long)]
    pub payload: Option<String>,

    /// Payload encoding: text, hex or base64
    #[arg(long)]
    pub encoding: Option<PayloadEncoding>,

    /// Number of times the payload data is repeated
    #[arg(long)]
    pub repeat: Option<usize>,
}

impl SenderArgs {
    fn apply_to(&self, config: &mut Config) -> udpbeat::Result<()> {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(interval) = &self.interval {
            config.interval_seconds = parse_interval(interval)?.as_secs_f64();
        }
        if let Some(data) = &self.payload {
            config.payload.data = data.clone();
            config.payload.repeat = 1;
        }
        if let Some(encoding) = self.encoding {
            config.payload.encoding = encoding;
        }
        if let Some(repeat) = self.repeat {
            config.payload.repeat = repeat;
        }
        Ok(())
    }
}

/// Layer file, environment, and flags into a validated config.
pub(crate) fn build_config(args: &SenderArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().with_context(|| "Failed to load configuration")?,
    };

    config.apply_env_overrides()?;
    args.apply_to(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Map an error to its taxonomy name and process exit code.
pub(crate) fn classify_exit(err: &anyhow::Error) -> (&'static str, u8) {
    match err.downcast_ref::<BeatError>() {
        Some(beat) if beat.is_config() => (beat.kind(), EXIT_CONFIG),
        Some(beat) => (beat.kind(), EXIT_FATAL),
        None => ("FatalSenderError", EXIT_FATAL),
    }
}
