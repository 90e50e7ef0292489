//! Per-run counters for the heartbeat sender.

use serde::Serialize;

/// Counters for one run of the send loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SenderStats {
    /// Loop iterations that attempted a send.
    pub ticks: u64,
    pub datagrams_sent: u64,
    pub bytes_sent: u64,
    /// Ticks whose send failed or was truncated but did not stop the loop.
    pub transient_failures: u64,
}

impl SenderStats {
    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.datagrams_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub(crate) fn record_transient(&mut self) {
        self.transient_failures += 1;
    }
}
