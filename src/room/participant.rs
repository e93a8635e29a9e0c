//! Seats at the table: humans and AI players.

use std::fmt;

use uuid::Uuid;

use crate::ai::AiPolicy;
use crate::domain::Card;

/// One seat. Humans carry their session token (the key to the socket table
/// and to reconnection); AI seats carry their decision policy instead. The
/// socket itself is never stored here.
pub enum Participant {
    Human {
        name: String,
        hand: Vec<Card>,
        tricks_won: u8,
        session_id: Uuid,
    },
    Ai {
        name: String,
        hand: Vec<Card>,
        tricks_won: u8,
        policy: Box<dyn AiPolicy>,
    },
}

impl Participant {
    pub fn human(name: impl Into<String>, session_id: Uuid) -> Self {
        Participant::Human {
            name: name.into(),
            hand: Vec::new(),
            tricks_won: 0,
            session_id,
        }
    }

    pub fn ai(name: impl Into<String>, policy: Box<dyn AiPolicy>) -> Self {
        Participant::Ai {
            name: name.into(),
            hand: Vec::new(),
            tricks_won: 0,
            policy,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Participant::Human { name, .. } | Participant::Ai { name, .. } => name,
        }
    }

    pub fn hand(&self) -> &[Card] {
        match self {
            Participant::Human { hand, .. } | Participant::Ai { hand, .. } => hand,
        }
    }

    pub fn hand_mut(&mut self) -> &mut Vec<Card> {
        match self {
            Participant::Human { hand, .. } | Participant::Ai { hand, .. } => hand,
        }
    }

    pub fn tricks_won(&self) -> u8 {
        match self {
            Participant::Human { tricks_won, .. } | Participant::Ai { tricks_won, .. } => {
                *tricks_won
            }
        }
    }

    pub fn record_trick(&mut self) {
        match self {
            Participant::Human { tricks_won, .. } | Participant::Ai { tricks_won, .. } => {
                *tricks_won += 1
            }
        }
    }

    pub fn reset_tricks(&mut self) {
        match self {
            Participant::Human { tricks_won, .. } | Participant::Ai { tricks_won, .. } => {
                *tricks_won = 0
            }
        }
    }

    /// Back to the lobby: no hand, no tricks.
    pub fn reset_for_new_game(&mut self) {
        self.hand_mut().clear();
        self.reset_tricks();
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Participant::Ai { .. })
    }

    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            Participant::Human { session_id, .. } => Some(*session_id),
            Participant::Ai { .. } => None,
        }
    }

    pub fn policy(&self) -> Option<&dyn AiPolicy> {
        match self {
            Participant::Ai { policy, .. } => Some(policy.as_ref()),
            Participant::Human { .. } => None,
        }
    }

    /// Remove exactly one instance of `card` from the hand. With multiple
    /// decks in play the hand may hold value-equal duplicates; only the
    /// first match leaves.
    pub fn take_card(&mut self, card: Card) -> Option<Card> {
        let hand = self.hand_mut();
        let pos = hand.iter().position(|c| *c == card)?;
        Some(hand.remove(pos))
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(if self.is_ai() { "Ai" } else { "Human" })
            .field("name", &self.name())
            .field("hand", &self.hand())
            .field("tricks_won", &self.tricks_won())
            .finish()
    }
}
