//! Wire-facing view of a room.

use serde::Serialize;

use super::engine::Phase;
use crate::domain::Card;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub name: String,
    pub trick_count: u8,
    #[serde(rename = "isAI")]
    pub is_ai: bool,
}

/// Authoritative state as clients see it. `hand` is present only in
/// snapshots addressed to a seated human and holds that human's own cards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub code: String,
    pub current_round: u8,
    pub trump_suit: Option<String>,
    pub current_trick: Vec<(String, Card)>,
    pub players: Vec<PlayerSummary>,
    pub spectators: Vec<String>,
    pub state: Phase,
    pub current_player: Option<String>,
    pub trump_caller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
}
