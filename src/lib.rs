#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod ai;
pub mod domain;
pub mod errors;
pub mod room;
pub mod server;
pub mod telemetry;
pub mod utils;
pub mod ws;

// Re-exports for the public API
pub use errors::GameError;
pub use room::{Pacing, MAX_PLAYERS};
pub use server::{GameServer, ServerConfig, Transport};
