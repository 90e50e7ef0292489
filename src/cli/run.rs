//! Run command: send heartbeats until Ctrl+C / SIGTERM.

use anyhow::Result;
use tracing::{info, warn};

use udpbeat::heartbeat::{self, shutdown_channel, ShutdownHandle};

use super::{build_config, SenderArgs};

pub(crate) async fn cmd_run(args: SenderArgs, summary: bool) -> Result<()> {
    let config = build_config(&args)?;
    let destination = config.destination();
    let payload = config.payload()?;
    let interval = config.interval()?;

    let (handle, signal) = shutdown_channel();
    spawn_signal_listener(handle);

    let stats = heartbeat::run(&destination, payload, interval, signal).await?;

    if summary {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

/// Trigger shutdown on the first Ctrl+C or SIGTERM.
fn spawn_signal_listener(handle: ShutdownHandle) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        handle.trigger();
    });
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            warn!("Failed to listen for SIGTERM: {}", e);
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}
