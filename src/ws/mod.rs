//! WebSocket layer: wire protocol types and the per-socket session actor.

pub mod protocol;
pub mod session;
