//! Deck construction for multi-deck deals.
//!
//! A table of N players dealt `hand_size` cards each needs
//! ⌈N·hand_size / 52⌉ copies of the standard deck, so duplicate cards are
//! legal entities. Each copy contributes distinct `Vec` elements; once dealt,
//! duplicates are tracked by position, never collapsed by value.

use rand::seq::SliceRandom;
use rand::Rng;

use super::cards::{Card, Rank, Suit};

/// Number of 52-card decks needed to deal `hand_size` cards to each of
/// `player_count` players.
pub fn decks_required(player_count: usize, hand_size: u8) -> usize {
    let needed = player_count * hand_size as usize;
    needed.div_ceil(52).max(1)
}

/// Build the concatenated multi-deck and shuffle it uniformly with the
/// caller's RNG. The RNG is injected so deals are reproducible under a
/// seeded generator.
pub fn build_shuffled_deck<R: Rng>(player_count: usize, hand_size: u8, rng: &mut R) -> Vec<Card> {
    let copies = decks_required(player_count, hand_size);
    let mut deck = Vec::with_capacity(copies * 52);
    for _ in 0..copies {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                deck.push(Card { suit, rank });
            }
        }
    }
    deck.shuffle(rng);
    deck
}
