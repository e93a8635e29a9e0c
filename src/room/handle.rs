//! Room lane: commands in, broadcasts out.
//!
//! Each room runs as one tokio task draining an unbounded channel. Because
//! the engine awaits its pacing sleeps inline, the lane naturally enqueues
//! (and does not apply) client messages while a pause is in progress.

use tokio::sync::{mpsc, oneshot};
use tracing::info;
use uuid::Uuid;

use super::engine::{Room, RoomStatus};
use crate::errors::GameError;

#[derive(Debug)]
pub enum RoomCommand {
    Join {
        session_id: Uuid,
        name: String,
        /// True for the room's creator, whose ack is `gameCreated` rather
        /// than `joined`.
        created: bool,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    Reconnect {
        session_id: Uuid,
    },
    AddAi {
        session_id: Uuid,
        name: Option<String>,
    },
    StartGame {
        session_id: Uuid,
    },
    CallTrumps {
        session_id: Uuid,
        suit: String,
    },
    PlayCard {
        session_id: Uuid,
        card: String,
    },
    PlayAgain {
        session_id: Uuid,
    },
    Disconnected {
        session_id: Uuid,
    },
}

/// Cheap cloneable sender half of a room's lane; what the registry stores.
#[derive(Clone)]
pub struct RoomHandle {
    code: String,
    tx: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Enqueue a command. Fails only when the room task has already shut
    /// down, which callers surface as a missing room.
    pub fn send(&self, cmd: RoomCommand) -> Result<(), GameError> {
        self.tx.send(cmd).map_err(|_| GameError::RoomNotFound)
    }
}

/// Spawn the lane task for `room`. `cleanup` runs exactly once after the
/// lane drains, whether teardown came from inside (room emptied) or outside
/// (handle dropped).
pub fn spawn_room(mut room: Room, cleanup: impl FnOnce() + Send + 'static) -> RoomHandle {
    let code = room.code().to_string();
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            if room.handle(cmd).await == RoomStatus::Teardown {
                break;
            }
        }
        info!(code = %room.code(), "room lane closed");
        cleanup();
    });
    RoomHandle { code, tx }
}
