//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket frame format of the broadcast relay. Every frame is a
//! JSON object `{"event": "...", "data": ...}`.

use serde::{Deserialize, Serialize};

/// A relay frame, in either direction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RelayFrame {
    /// Sent by the server once the peer is subscribed; carries the peer's id.
    /// Clients never send it.
    Connect(String),

    /// A message to relay. Sent by clients, and echoed by the server to every
    /// subscribed peer, the sender included.
    Message(String),
}
