use shared::domain::CommandState;

use crate::channel::{ChannelStatus, ControlChannel};

/// Where the session delivers snapshots. Implementations must not block and
/// must not report delivery failures back to the caller.
pub trait SnapshotSink {
    fn status(&self) -> ChannelStatus;
    fn push(&self, snapshot: &CommandState);
}

impl SnapshotSink for ControlChannel {
    fn status(&self) -> ChannelStatus {
        ControlChannel::status(self)
    }

    fn push(&self, snapshot: &CommandState) {
        ControlChannel::push(self, snapshot);
    }
}
