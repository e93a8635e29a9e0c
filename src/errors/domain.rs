//! Domain-level error type used across the room engine and the registry.
//!
//! This error type is transport-agnostic. The dispatch boundary serialises it
//! as `{type: "error", message}` to the originating socket only; room state is
//! never changed by a rejected message.

use thiserror::Error;

/// Every way a client message can be rejected.
///
/// The `#[error]` strings are the exact user-facing messages on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Not time to play")]
    NotTimeToPlay,
    #[error("Not time to call trumps")]
    NotTimeToCallTrumps,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Not your turn to call trumps")]
    NotYourTurnToCallTrumps,
    #[error("Already played this round")]
    DuplicatePlay,
    #[error("Card not in hand")]
    NotInHand,
    #[error("Must follow suit")]
    MustFollowSuit,
    #[error("Invalid suit")]
    InvalidSuit,
    #[error("Game not found")]
    RoomNotFound,
    #[error("Game full")]
    RoomFull,
    #[error("Game already started")]
    RoomAlreadyStarted,
    #[error("Invalid session")]
    InvalidSession,
    #[error("Need at least 2 players")]
    NotEnoughPlayers,
    /// Malformed JSON, unknown message type, or a bad card token.
    /// The connection stays open.
    #[error("{0}")]
    Parse(String),
}

impl GameError {
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse(detail.into())
    }
}
