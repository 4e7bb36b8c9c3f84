//! Operator-side core: command state synchronization over a persistent
//! WebSocket control channel.

pub mod channel;
pub mod session;
pub mod sink;

pub use channel::{ChannelError, ChannelStatus, ControlChannel};
pub use session::ControllerSession;
pub use sink::SnapshotSink;

#[cfg(test)]
#[path = "tests/test_device.rs"]
mod test_device;
