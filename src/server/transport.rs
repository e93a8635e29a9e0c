//! Outbound transport seam.
//!
//! The engine broadcasts through [`SocketTable`] and never sees the socket
//! type. Sockets are keyed by session token rather than stored inside
//! participants, so reconnecting rebinds a session by replacing one map
//! entry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::ws::protocol::ServerMsg;

/// One live outbound channel. The production implementation wraps the
/// WebSocket session actor; tests substitute an in-memory channel.
pub trait Transport: Send + Sync {
    fn send(&self, payload: String);
}

/// Live sockets by session token.
#[derive(Default)]
pub struct SocketTable {
    inner: DashMap<Uuid, Arc<dyn Transport>>,
}

impl SocketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind, on reconnect) a session's live socket.
    pub fn register(&self, session_id: Uuid, transport: Arc<dyn Transport>) {
        self.inner.insert(session_id, transport);
    }

    pub fn unregister(&self, session_id: Uuid) {
        self.inner.remove(&session_id);
    }

    pub fn is_connected(&self, session_id: Uuid) -> bool {
        self.inner.contains_key(&session_id)
    }

    /// Serialise and deliver to one session. Sessions without a live socket
    /// (dropped mid-game, awaiting reconnect) are skipped.
    pub fn send(&self, session_id: Uuid, msg: &ServerMsg) {
        let Some(transport) = self.inner.get(&session_id) else {
            return;
        };
        match serde_json::to_string(msg) {
            Ok(payload) => transport.send(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound message"),
        }
    }
}
