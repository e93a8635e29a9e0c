//! Shared helpers for integration tests.
#![allow(dead_code)] // each test binary uses a different subset

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use knockout_whist_server::{GameServer, Pacing, ServerConfig, Transport};

/// In-memory transport that records every frame as parsed JSON.
#[derive(Default)]
pub struct Capture {
    messages: Mutex<Vec<Value>>,
}

impl Capture {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Value> {
        self.messages.lock().clone()
    }

    pub fn last_of(&self, ty: &str) -> Option<Value> {
        self.messages
            .lock()
            .iter()
            .rev()
            .find(|m| m["type"] == ty)
            .cloned()
    }

    pub fn count_of(&self, ty: &str) -> usize {
        self.messages.lock().iter().filter(|m| m["type"] == ty).count()
    }
}

impl Transport for Capture {
    fn send(&self, payload: String) {
        if let Ok(value) = serde_json::from_str(&payload) {
            self.messages.lock().push(value);
        }
    }
}

/// A server with zero pacing and a fixed per-room seed.
pub fn test_server() -> GameServer {
    GameServer::new(ServerConfig {
        pacing: Pacing::zero(),
        room_seed: Some(42),
    })
}

/// Poll until `cond` holds, yielding to background tasks, or panic after a
/// generous deadline.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    for _ in 0..500 {
        if cond() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    panic!("condition not reached in time");
}
