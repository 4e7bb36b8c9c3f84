//! Persistent WebSocket link to the vehicle.
//!
//! The socket lives inside one spawned task for its whole life. The
//! [`ControlChannel`] handle only enqueues frames and reads status, so nothing
//! here ever blocks the caller.

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use shared::{domain::Endpoint, protocol::encode_snapshot};
use thiserror::Error;
use tokio::{
    sync::{
        mpsc::{self, error::TryRecvError},
        watch,
    },
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite, tungstenite::Message};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ChannelStatus {
    pub fn is_open(self) -> bool {
        self == ChannelStatus::Open
    }

    /// Closed and Errored are final for a session; no reconnect is attempted.
    pub fn is_terminal(self) -> bool {
        matches!(self, ChannelStatus::Closed | ChannelStatus::Errored)
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect websocket {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("websocket send failed: {0}")]
    Send(#[source] tungstenite::Error),
    #[error("websocket receive failed: {0}")]
    Receive(#[source] tungstenite::Error),
}

enum Outbound {
    Frame(String),
    Close,
}

pub struct ControlChannel {
    endpoint: Endpoint,
    status: watch::Receiver<ChannelStatus>,
    outbound: mpsc::UnboundedSender<Outbound>,
    task: Option<JoinHandle<()>>,
    closing: bool,
}

impl ControlChannel {
    /// Starts the single connection attempt for this session and returns
    /// immediately in `Connecting`. Must be called inside a tokio runtime.
    pub fn connect(endpoint: Endpoint) -> Self {
        let (status_tx, status_rx) = watch::channel(ChannelStatus::Connecting);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        info!(endpoint = %endpoint, "control channel connecting");
        let task = tokio::spawn(run_connection(endpoint.clone(), status_tx, outbound_rx));

        Self {
            endpoint,
            status: status_rx,
            outbound: outbound_tx,
            task: Some(task),
            closing: false,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn status(&self) -> ChannelStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ChannelStatus> {
        self.status.clone()
    }

    /// Fire-and-forget send of the full record. Dropped silently unless the
    /// channel is open.
    pub fn push<T: Serialize + ?Sized>(&self, record: &T) {
        if self.closing || !self.status().is_open() {
            trace!(status = ?self.status(), "control channel not open; dropping push");
            return;
        }

        let text = match encode_snapshot(record) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "failed to encode push; dropping");
                return;
            }
        };
        if self.outbound.send(Outbound::Frame(text)).is_err() {
            trace!("control channel task already finished; dropping push");
        }
    }

    /// Requests release of the connection. Idempotent; the socket is released
    /// by the connection task exactly once.
    pub fn close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;
        debug!(endpoint = %self.endpoint, "control channel close requested");
        let _ = self.outbound.send(Outbound::Close);
    }

    /// Closes the channel and waits for the connection task to release the
    /// socket. Resolves once the status is terminal.
    pub async fn shutdown(mut self) -> ChannelStatus {
        self.close();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "control channel task ended abnormally");
            }
        }
        self.status()
    }
}

impl Drop for ControlChannel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(
    endpoint: Endpoint,
    status: watch::Sender<ChannelStatus>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
) {
    let final_status = match drive_connection(&endpoint, &status, &mut outbound).await {
        Ok(()) => ChannelStatus::Closed,
        Err(err) => {
            warn!(endpoint = %endpoint, error = %err, "control channel errored");
            ChannelStatus::Errored
        }
    };
    status.send_replace(final_status);
    info!(endpoint = %endpoint, status = ?final_status, "control channel released");
}

async fn drive_connection(
    endpoint: &Endpoint,
    status: &watch::Sender<ChannelStatus>,
    outbound: &mut mpsc::UnboundedReceiver<Outbound>,
) -> Result<(), ChannelError> {
    let (ws_stream, _) =
        connect_async(endpoint.as_str())
            .await
            .map_err(|source| ChannelError::Connect {
                endpoint: endpoint.to_string(),
                source,
            })?;
    let (mut writer, mut reader) = ws_stream.split();

    // Nothing is queued before Open, so anything pending here is a close request.
    match outbound.try_recv() {
        Err(TryRecvError::Empty) => {}
        Ok(_) | Err(TryRecvError::Disconnected) => {
            debug!(endpoint = %endpoint, "closed while connecting");
            let _ = writer.close().await;
            return Ok(());
        }
    }

    status.send_replace(ChannelStatus::Open);
    info!(endpoint = %endpoint, "control channel open");

    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Frame(text)) => {
                    trace!(bytes = text.len(), "sending snapshot");
                    writer.send(Message::Text(text)).await.map_err(ChannelError::Send)?;
                }
                Some(Outbound::Close) | None => {
                    if let Err(err) = writer.close().await {
                        debug!(error = %err, "websocket close handshake failed");
                    }
                    return Ok(());
                }
            },
            inbound = reader.next() => match inbound {
                Some(Ok(Message::Close(frame))) => {
                    info!(endpoint = %endpoint, ?frame, "device closed the control channel");
                    return Ok(());
                }
                // Device frames carry nothing the controller consumes.
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(ChannelError::Receive(err)),
                None => return Ok(()),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/channel_tests.rs"]
mod tests;
