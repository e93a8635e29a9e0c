//! AI-controlled seats.

mod basic;

pub use basic::BasicAi;

use crate::domain::{Card, Suit, Trick};

/// Decision policy for an AI seat.
///
/// Implementations are pure functions of the visible state: they never
/// mutate, and the engine applies their choices through the same legality
/// checks as human plays. `choose_card` is only called with a non-empty
/// hand.
pub trait AiPolicy: Send + Sync {
    /// Pick a trump suit for the coming round.
    fn choose_trump(&self, hand: &[Card]) -> Suit;

    /// Pick a card to contribute to the (possibly empty) current trick.
    fn choose_card(&self, hand: &[Card], trick: &Trick, trump: Suit) -> Card;
}
