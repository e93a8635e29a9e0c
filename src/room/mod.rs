//! Per-room game engine and its lane.

pub mod engine;
pub mod handle;
pub mod pacing;
pub mod participant;
pub mod snapshot;


pub use engine::{Phase, Room, RoomConfig, RoomStatus, MAX_PLAYERS, STARTING_ROUND};
pub use handle::{spawn_room, RoomCommand, RoomHandle};
pub use pacing::Pacing;
pub use participant::Participant;
