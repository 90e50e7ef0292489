//! Interval parsing for the heartbeat tick schedule.

use std::time::Duration;

use crate::error::{BeatError, Result};

/// Parse interval string like "500ms", "1s", "2m", "1h" or a bare number of
/// seconds ("1.5") into a strictly positive [`Duration`].
pub fn parse_interval(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    let (number, scale) = if let Some(millis) = s.strip_suffix("ms") {
        (millis, 0.001)
    } else if let Some(hours) = s.strip_suffix('h') {
        (hours, 3600.0)
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60.0)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1.0)
    } else {
        (s.as_str(), 1.0)
    };

    let value: f64 = number.trim().parse().map_err(|_| {
        BeatError::Config(format!(
            "Invalid interval '{}'. Use formats like 500ms, 1s, 2m, 1h",
            s
        ))
    })?;

    interval_from_secs(value * scale)
}

/// Convert a number of seconds into a strictly positive interval.
pub fn interval_from_secs(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(BeatError::Config(format!(
            "Interval must be a positive number of seconds, got {}",
            secs
        )));
    }

    let interval = Duration::try_from_secs_f64(secs)
        .map_err(|e| BeatError::Config(format!("Invalid interval {}s: {}", secs, e)))?;
    validate_interval(interval)
}

/// Reject intervals that would make the ticker spin.
pub fn validate_interval(interval: Duration) -> Result<Duration> {
    if interval.is_zero() {
        return Err(BeatError::Config(
            "Interval must be strictly positive".into(),
        ));
    }
    Ok(interval)
}
