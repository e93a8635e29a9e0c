//! Domain layer: pure game logic, no I/O.

pub mod cards;
pub mod deck;
pub mod rules;
pub mod trick;

// Re-exports for ergonomics
pub use cards::{Card, Rank, Suit};
pub use deck::{build_shuffled_deck, decks_required};
pub use rules::{card_beats, check_play, hand_has_suit, playable_cards};
pub use trick::Trick;
