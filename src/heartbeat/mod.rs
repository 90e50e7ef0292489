//! Heartbeat sender - periodic fire-and-forget UDP datagrams.

mod destination;
mod sender;
mod shutdown;
mod stats;
mod transport;

pub use destination::Destination;
pub use sender::{run, HeartbeatSender};
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownSignal};
pub use stats::SenderStats;
pub use transport::{classify_send_error, is_transient, DatagramTransport, UdpTransport};
