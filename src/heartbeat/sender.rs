//! Heartbeat sender implementation.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::{validate_interval, Payload};
use crate::error::{BeatError, Result};

use super::destination::Destination;
use super::shutdown::ShutdownSignal;
use super::stats::SenderStats;
use super::transport::{classify_send_error, DatagramTransport, UdpTransport};

/// Fixed-rate loop that sends one datagram per tick until shutdown.
///
/// The sender owns its transport exclusively. [`HeartbeatSender::run`]
/// consumes the sender, so the socket is released on every exit path.
pub struct HeartbeatSender<T: DatagramTransport> {
    transport: T,
    target: SocketAddr,
    payload: Payload,
    interval: Duration,
    shutdown: ShutdownSignal,
}

impl<T: DatagramTransport> HeartbeatSender<T> {
    /// Create a new heartbeat sender over an already-open transport.
    pub fn new(
        transport: T,
        target: SocketAddr,
        payload: Payload,
        interval: Duration,
        shutdown: ShutdownSignal,
    ) -> Result<Self> {
        let interval = validate_interval(interval)?;
        Ok(Self {
            transport,
            target,
            payload,
            interval,
            shutdown,
        })
    }

    /// Run the send/sleep loop.
    ///
    /// The first send happens immediately. Returns `Ok` with the run's
    /// counters once shutdown is requested, or the first fatal error.
    pub async fn run(mut self) -> Result<SenderStats> {
        let mut stats = SenderStats::default();
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Heartbeat sender started (target={}, bytes={}, interval={:?})",
            self.target,
            self.payload.len(),
            self.interval
        );

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.triggered() => break,
                _ = ticker.tick() => {}
            }

            if self.shutdown.is_triggered() {
                break;
            }

            stats.record_tick();
            let outcome = tokio::select! {
                biased;
                _ = self.shutdown.triggered() => None,
                result = self.transport.send_to(self.payload.as_bytes(), self.target) => Some(result),
            };
            let Some(outcome) = outcome else {
                debug!(tick = stats.ticks, "Heartbeat send abandoned on shutdown");
                break;
            };

            match outcome {
                Ok(sent) if sent == self.payload.len() => {
                    stats.record_sent(sent);
                    debug!(tick = stats.ticks, bytes = sent, "Heartbeat sent");
                }
                Ok(sent) => {
                    stats.record_transient();
                    warn!(
                        "Heartbeat tick {} truncated: sent {} of {} bytes",
                        stats.ticks,
                        sent,
                        self.payload.len()
                    );
                }
                Err(e) => match classify_send_error(e, self.target) {
                    err @ BeatError::TransientSend(_) => {
                        stats.record_transient();
                        warn!("Heartbeat tick {} failed: {}", stats.ticks, err);
                    }
                    err => {
                        error!(
                            "Heartbeat sender stopping after {} ticks: {}",
                            stats.ticks, err
                        );
                        return Err(err);
                    }
                },
            }
        }

        info!(
            "Heartbeat sender stopped (sent={}, transient_failures={})",
            stats.datagrams_sent, stats.transient_failures
        );
        Ok(stats)
    }
}

/// Validate, resolve, open a UDP socket, and run until shutdown.
///
/// Configuration problems surface as [`BeatError::Config`] before any socket
/// is opened.
pub async fn run(
    destination: &Destination,
    payload: Payload,
    interval: Duration,
    shutdown: ShutdownSignal,
) -> Result<SenderStats> {
    let interval = validate_interval(interval)?;
    let target = destination.resolve().await?;
    let transport = UdpTransport::bind_for(target).await?;

    match transport.local_addr() {
        Ok(local) => info!("Opened UDP socket {} -> {} ({})", local, target, destination),
        Err(e) => warn!("Opened UDP socket with unknown local address: {}", e),
    }

    HeartbeatSender::new(transport, target, payload, interval, shutdown)?
        .run()
        .await
}
