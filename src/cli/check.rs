//! Check command: validate the effective configuration without sending.

use std::net::SocketAddr;

use anyhow::Result;
use serde_json::{json, Value};

use udpbeat::Config;

use super::{build_config, SenderArgs};

pub(crate) async fn cmd_check(args: SenderArgs) -> Result<()> {
    let config = build_config(&args)?;
    let resolved = config.destination().resolve().await?;

    let report = check_report(&config, resolved)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn check_report(config: &Config, resolved: SocketAddr) -> Result<Value> {
    Ok(json!({
        "config": config,
        "resolved": resolved.to_string(),
        "payload_bytes": config.payload()?.len(),
        "interval_seconds": config.interval()?.as_secs_f64(),
    }))
}
