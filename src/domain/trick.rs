//! Ordered record of the plays within one trick.

use super::cards::{Card, Suit};
use super::rules::card_beats;
use crate::errors::GameError;

/// Plays are `(seat, card)` pairs in play order. Seats index the room's
/// active player list, which never changes mid-round, so the indices stay
/// valid for the life of the trick.
#[derive(Debug, Clone, Default)]
pub struct Trick {
    plays: Vec<(usize, Card)>,
}

impl Trick {
    pub fn new() -> Self {
        Self { plays: Vec::new() }
    }

    pub fn plays(&self) -> &[(usize, Card)] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    /// Suit of the first play, or `None` while the trick is empty.
    pub fn led_suit(&self) -> Option<Suit> {
        self.plays.first().map(|(_, c)| c.suit)
    }

    pub fn has_played(&self, seat: usize) -> bool {
        self.plays.iter().any(|(s, _)| *s == seat)
    }

    pub fn add_play(&mut self, seat: usize, card: Card) -> Result<(), GameError> {
        if self.has_played(seat) {
            return Err(GameError::DuplicatePlay);
        }
        self.plays.push((seat, card));
        Ok(())
    }

    pub fn is_complete(&self, player_count: usize) -> bool {
        self.plays.len() == player_count
    }

    pub fn clear(&mut self) {
        self.plays.clear();
    }

    /// The card currently winning the (possibly partial) trick.
    pub fn winning_card(&self, trump: Suit) -> Option<Card> {
        self.winning_play(trump).map(|(_, c)| c)
    }

    /// Seat of the trick winner. Among value-tied cards (possible with
    /// multiple decks) the earliest play wins: a later card must strictly
    /// beat the incumbent to take over.
    pub fn winner(&self, trump: Suit) -> Option<usize> {
        self.winning_play(trump).map(|(seat, _)| seat)
    }

    fn winning_play(&self, trump: Suit) -> Option<(usize, Card)> {
        let led = self.led_suit()?;
        let mut best = *self.plays.first()?;
        for &(seat, card) in &self.plays[1..] {
            if card_beats(card, best.1, led, trump) {
                best = (seat, card);
            }
        }
        Some(best)
    }
}
