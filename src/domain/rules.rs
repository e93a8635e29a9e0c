//! Play legality and card precedence.

use super::cards::{Card, Suit};
use super::trick::Trick;
use crate::errors::GameError;

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Whether `a` beats `b`, given the led suit and the trump suit.
///
/// Trump beats non-trump; otherwise only led-suit cards compete, by rank.
/// Strict: value-equal cards (multi-deck) never beat each other, which is
/// what makes the earliest play win ties during trick resolution.
pub fn card_beats(a: Card, b: Card, led: Suit, trump: Suit) -> bool {
    let a_trump = a.suit == trump;
    let b_trump = b.suit == trump;
    if a_trump != b_trump {
        return a_trump;
    }
    if a_trump && b_trump {
        return a.rank > b.rank;
    }
    let a_follows = a.suit == led;
    let b_follows = b.suit == led;
    if a_follows != b_follows {
        return a_follows;
    }
    a_follows && a.rank > b.rank
}

/// The cards a hand may legally contribute to `trick`: the whole hand when
/// leading or void in the led suit, otherwise only led-suit cards.
pub fn playable_cards(hand: &[Card], trick: &Trick) -> Vec<Card> {
    match trick.led_suit() {
        Some(led) if hand_has_suit(hand, led) => {
            hand.iter().filter(|c| c.suit == led).copied().collect()
        }
        _ => hand.to_vec(),
    }
}

/// Card-level legality of playing `card` from `hand` into `trick`.
///
/// Phase, turn order and double-play are the engine's concern; this checks
/// ownership and the follow-suit obligation. There is no obligation to play
/// trump, nor to beat the current winner.
pub fn check_play(hand: &[Card], trick: &Trick, card: Card) -> Result<(), GameError> {
    if !hand.contains(&card) {
        return Err(GameError::NotInHand);
    }
    if let Some(led) = trick.led_suit() {
        if card.suit != led && hand_has_suit(hand, led) {
            return Err(GameError::MustFollowSuit);
        }
    }
    Ok(())
}
