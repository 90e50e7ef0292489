//! Datagram transport used by the heartbeat sender.
//!
//! [`DatagramTransport`] is the seam between the send loop and the network.
//! [`UdpTransport`] is the production implementation over a tokio
//! `UdpSocket`; tests substitute a recording transport.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::time::{self, Instant};

use crate::error::{BeatError, Result};

/// Something that can emit a single datagram to a target address.
///
/// Implementations release their socket on drop.
#[async_trait]
pub trait DatagramTransport: Send {
    /// Send `datagram` as one datagram, returning the number of bytes sent.
    async fn send_to(&mut self, datagram: &[u8], target: SocketAddr) -> io::Result<usize>;
}

/// How long a send may wait for the socket to become writable.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Unconnected UDP socket bound to the unspecified address of the target's
/// family on an ephemeral port.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    send_timeout: Duration,
}

impl UdpTransport {
    /// Open a socket able to reach `target`.
    pub async fn bind_for(target: SocketAddr) -> Result<Self> {
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await.map_err(|e| {
            BeatError::Fatal(format!("Failed to open UDP socket on {}: {}", local, e))
        })?;

        Ok(Self {
            socket,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        })
    }

    /// Override how long a send waits for writability before failing.
    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl DatagramTransport for UdpTransport {
    /// Fails with `WouldBlock` if the socket stays unwritable past the send
    /// timeout.
    async fn send_to(&mut self, datagram: &[u8], target: SocketAddr) -> io::Result<usize> {
        let deadline = Instant::now() + self.send_timeout;
        loop {
            time::timeout_at(deadline, self.socket.writable())
                .await
                .map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::WouldBlock,
                        format!("socket not writable within {:?}", self.send_timeout),
                    )
                })??;

            match self.socket.try_send_to(datagram, target) {
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
                result => return result,
            }
        }
    }
}

#[cfg(target_os = "linux")]
const ENOBUFS: Option<i32> = Some(105);
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
const ENOBUFS: Option<i32> = Some(55);
#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
)))]
const ENOBUFS: Option<i32> = None;

/// Whether a failed send may succeed on the next tick without intervention.
///
/// Unreachable destinations, ICMP-reported refusals, and local buffer or
/// memory exhaustion are transient. Everything else invalidates the socket.
pub fn is_transient(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::NetworkDown
            | io::ErrorKind::Interrupted
            | io::ErrorKind::TimedOut
            | io::ErrorKind::OutOfMemory
    ) {
        return true;
    }

    ENOBUFS.is_some() && err.raw_os_error() == ENOBUFS
}

/// Classify a send failure as `TransientSend` or `Fatal`.
pub fn classify_send_error(err: io::Error, target: SocketAddr) -> BeatError {
    if is_transient(&err) {
        BeatError::TransientSend(format!("send to {} failed: {}", target, err))
    } else {
        BeatError::Fatal(format!("send to {} failed: {}", target, err))
    }
}
