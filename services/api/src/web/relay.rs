//! services/api/src/web/relay.rs
//!
//! The real-time broadcast relay. Every message a peer sends on
//! `/api/socket/io` is forwarded to all peers subscribed at that moment,
//! including the sender. Nothing is persisted or acknowledged.

use crate::web::{protocol::RelayFrame, state::AppState};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

//=========================================================================================
// The Relay
//=========================================================================================

/// Process-wide fan-out point. The broadcast channel is created on first use
/// and every live connection holds one receiver on it.
pub struct Relay {
    channel: OnceLock<broadcast::Sender<String>>,
    capacity: usize,
    shutdown: CancellationToken,
}

impl Relay {
    /// `capacity` is the number of messages buffered for a slow peer before
    /// it starts skipping.
    pub fn new(capacity: usize) -> Self {
        Self {
            channel: OnceLock::new(),
            capacity: capacity.max(1),
            shutdown: CancellationToken::new(),
        }
    }

    fn sender(&self) -> &broadcast::Sender<String> {
        self.channel.get_or_init(|| {
            info!("Initialising relay channel (capacity {})", self.capacity);
            broadcast::channel(self.capacity).0
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender().subscribe()
    }

    /// Relays `message` to every subscribed peer and returns how many there were.
    pub fn publish(&self, message: String) -> usize {
        // A send with no receivers is not an error for a relay.
        self.sender().send(message).unwrap_or(0)
    }

    /// Number of peers currently subscribed.
    pub fn connected_peers(&self) -> usize {
        self.channel
            .get()
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Disconnects every peer and refuses new ones.
    pub fn shutdown(&self) {
        info!("Shutting down relay");
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

//=========================================================================================
// WebSocket Handling
//=========================================================================================

/// The handler for upgrading relay requests to WebSocket connections.
pub async fn relay_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    let relay = app_state.relay.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn send_frame(
    sender: &mut SplitSink<WebSocket, Message>,
    frame: &RelayFrame,
) -> Result<(), axum::Error> {
    match serde_json::to_string(frame) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!("Failed to encode relay frame: {}", e);
            Ok(())
        }
    }
}

async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {
    let peer_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    if relay.is_shut_down() {
        let _ = sender.send(Message::Close(None)).await;
        return;
    }

    // Subscribe before announcing the connection so that every message
    // published after the peer sees `connect` reaches it.
    let mut messages = relay.subscribe();
    info!("Relay peer {} connected ({} online)", peer_id, relay.connected_peers());

    if send_frame(&mut sender, &RelayFrame::Connect(peer_id.to_string()))
        .await
        .is_err()
    {
        info!("Relay peer {} disconnected before the handshake", peer_id);
        return;
    }

    // --- Writer: relay channel -> this peer ---
    let shutdown = relay.shutdown.clone();
    let mut writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
                received = messages.recv() => {
                    match received {
                        Ok(message) => {
                            if send_frame(&mut sender, &RelayFrame::Message(message)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Relay peer {} is lagging; skipped {} messages", peer_id, skipped);
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }
    });

    // --- Reader: this peer -> relay channel ---
    let publisher = relay.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<RelayFrame>(&text) {
                    Ok(RelayFrame::Message(data)) => {
                        let delivered = publisher.publish(data);
                        debug!("Relay peer {} published to {} peers", peer_id, delivered);
                    }
                    Ok(other) => {
                        warn!("Relay peer {} sent a server-only frame: {:?}", peer_id, other);
                    }
                    Err(e) => {
                        warn!("Relay peer {} sent an invalid frame: {}", peer_id, e);
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Whichever half finishes first ends the connection.
    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    info!("Relay peer {} disconnected", peer_id);
}
