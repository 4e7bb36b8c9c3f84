//! Glue between operator intents and the control channel.

use std::future::Future;

use shared::{
    domain::{CommandState, Endpoint},
    protocol::Intent,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    channel::{ChannelStatus, ControlChannel},
    sink::SnapshotSink,
};

/// Owns the authoritative [`CommandState`] and the sink it is pushed into.
///
/// Each intent that changes the snapshot triggers exactly one full push,
/// synchronously, before the next intent is handled.
pub struct ControllerSession<S = ControlChannel> {
    state: CommandState,
    sink: S,
    snapshots: watch::Sender<CommandState>,
}

impl<S: SnapshotSink> ControllerSession<S> {
    pub fn new(initial: CommandState, sink: S) -> Self {
        let (snapshots, _) = watch::channel(initial);
        Self {
            state: initial,
            sink,
            snapshots,
        }
    }

    pub fn snapshot(&self) -> CommandState {
        self.state
    }

    pub fn status(&self) -> ChannelStatus {
        self.sink.status()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<CommandState> {
        self.snapshots.subscribe()
    }

    /// Applies one intent. Returns `true` when the snapshot changed and a push
    /// was issued.
    pub fn apply(&mut self, intent: Intent) -> bool {
        let next = self.state.apply(intent);
        if next == self.state {
            debug!(intent = intent.name(), "intent left state unchanged");
            return false;
        }

        self.state = next;
        self.snapshots.send_replace(next);
        match serde_json::to_string_pretty(&next) {
            Ok(pretty) => debug!(intent = intent.name(), snapshot = %pretty, "command state changed"),
            Err(err) => warn!(error = %err, "failed to render snapshot"),
        }
        self.sink.push(&self.state);
        true
    }

    /// Sends the current snapshot when the link comes up, so state set while
    /// connecting reaches the device.
    pub fn on_status_change(&mut self, status: ChannelStatus) {
        info!(status = ?status, "control channel status changed");
        if status.is_open() {
            self.sink.push(&self.state);
        }
    }
}

impl ControllerSession<ControlChannel> {
    /// Opens the session's one connection and starts in `initial`.
    pub fn connect(endpoint: Endpoint, initial: CommandState) -> Self {
        Self::new(initial, ControlChannel::connect(endpoint))
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ChannelStatus> {
        self.sink.subscribe_status()
    }

    /// Event loop: handles intents and channel status transitions on one task
    /// until the intent source ends or `shutdown` resolves, then releases the
    /// connection. Returns the final snapshot.
    pub async fn run<F>(mut self, mut intents: mpsc::Receiver<Intent>, shutdown: F) -> CommandState
    where
        F: Future<Output = ()>,
    {
        let mut status_rx = self.sink.subscribe_status();
        let initial_status = *status_rx.borrow_and_update();
        if initial_status.is_open() {
            self.on_status_change(initial_status);
        }
        let mut status_live = true;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => {
                        self.apply(intent);
                    }
                    None => {
                        debug!("intent source ended");
                        break;
                    }
                },
                changed = status_rx.changed(), if status_live => match changed {
                    Ok(()) => {
                        let status = *status_rx.borrow_and_update();
                        self.on_status_change(status);
                    }
                    // The connection task is gone; keep serving intents locally.
                    Err(_) => status_live = false,
                },
                () = &mut shutdown => {
                    debug!("shutdown requested");
                    break;
                }
            }
        }

        self.shutdown().await
    }

    /// Tears the session down, releasing the connection, and returns the final
    /// snapshot.
    pub async fn shutdown(self) -> CommandState {
        let state = self.state;
        let status = self.sink.shutdown().await;
        info!(status = ?status, "controller session ended");
        state
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
