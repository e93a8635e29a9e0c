//! BasicAi — the deterministic baseline policy for AI seats.
//!
//! Trump selection weighs suit length against raw strength; card selection
//! wins as cheaply as possible and discards low otherwise. No RNG, so a
//! seeded room replays identically.

use super::AiPolicy;
use crate::domain::{card_beats, playable_cards, Card, Rank, Suit, Trick};

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAi;

fn lowest(cards: &[Card]) -> Option<Card> {
    cards.iter().copied().min_by_key(|c| c.rank)
}

fn highest(cards: &[Card]) -> Option<Card> {
    cards.iter().copied().max_by_key(|c| c.rank)
}

impl BasicAi {
    /// `10·count + Σrank` per suit; the scan order of [`Suit::ALL`] breaks
    /// ties, so a tied score keeps the earlier suit.
    fn trump_score(hand: &[Card], suit: Suit) -> u32 {
        let count = hand.iter().filter(|c| c.suit == suit).count() as u32;
        let strength: u32 = hand
            .iter()
            .filter(|c| c.suit == suit)
            .map(|c| c.rank.value() as u32)
            .sum();
        count * 10 + strength
    }

    fn lead(&self, hand: &[Card], trump: Suit) -> Option<Card> {
        let non_trump: Vec<Card> = hand.iter().filter(|c| c.suit != trump).copied().collect();

        // Lead a high non-trump card when holding one, else the lowest
        // non-trump; a pure trump hand leads its lowest trump.
        let high: Vec<Card> = non_trump
            .iter()
            .filter(|c| c.rank >= Rank::Queen)
            .copied()
            .collect();
        if !high.is_empty() {
            return highest(&high);
        }
        if !non_trump.is_empty() {
            return lowest(&non_trump);
        }
        lowest(hand)
    }

    fn follow(&self, playable: &[Card], trick: &Trick, trump: Suit) -> Option<Card> {
        let (Some(led), Some(to_beat)) = (trick.led_suit(), trick.winning_card(trump)) else {
            return lowest(playable);
        };

        let winners: Vec<Card> = playable
            .iter()
            .filter(|c| card_beats(**c, to_beat, led, trump))
            .copied()
            .collect();
        if !winners.is_empty() {
            // Win with the cheapest card that still wins.
            return lowest(&winners);
        }
        lowest(playable)
    }
}

impl AiPolicy for BasicAi {
    fn choose_trump(&self, hand: &[Card]) -> Suit {
        let mut best = (Suit::ALL[0], Self::trump_score(hand, Suit::ALL[0]));
        for suit in &Suit::ALL[1..] {
            let score = Self::trump_score(hand, *suit);
            if score > best.1 {
                best = (*suit, score);
            }
        }
        best.0
    }

    fn choose_card(&self, hand: &[Card], trick: &Trick, trump: Suit) -> Card {
        let playable = playable_cards(hand, trick);
        let choice = if trick.is_empty() {
            self.lead(hand, trump)
        } else {
            self.follow(&playable, trick, trump)
        };
        // The engine only consults the policy for non-empty hands.
        choice.unwrap_or(Card {
            suit: trump,
            rank: Rank::Two,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(tokens: &[&str]) -> Vec<Card> {
        tokens
            .iter()
            .map(|t| t.parse().expect("hardcoded valid card token"))
            .collect()
    }

    fn card(s: &str) -> Card {
        s.parse().expect("hardcoded valid card token")
    }

    #[test]
    fn trump_choice_favors_long_strong_suit() {
        // Four low spades (score 54) beat three lone aces (24 each).
        let hand = cards(&["2♠", "3♠", "4♠", "5♠", "A♥", "A♦", "A♣"]);
        assert_eq!(BasicAi.choose_trump(&hand), Suit::Spades);
    }

    #[test]
    fn trump_choice_breaks_ties_by_suit_order() {
        // Hearts and clubs score identically; hearts comes first in the
        // scan order.
        let hand = cards(&["A♥", "A♣"]);
        assert_eq!(BasicAi.choose_trump(&hand), Suit::Hearts);
    }

    #[test]
    fn leads_highest_non_trump_honor() {
        let hand = cards(&["Q♥", "K♦", "2♣", "A♠"]);
        let trick = Trick::new();
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("K♦"));
    }

    #[test]
    fn leads_lowest_when_holding_no_honors() {
        let hand = cards(&["9♥", "4♦", "7♣"]);
        let trick = Trick::new();
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("4♦"));
    }

    #[test]
    fn leads_lowest_trump_from_pure_trump_hand() {
        let hand = cards(&["A♠", "7♠", "2♠"]);
        let trick = Trick::new();
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("2♠"));
    }

    #[test]
    fn follows_with_cheapest_winning_card() {
        let hand = cards(&["Q♥", "K♥", "A♥"]);
        let mut trick = Trick::new();
        trick.add_play(0, card("J♥")).unwrap();
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("Q♥"));
    }

    #[test]
    fn discards_lowest_when_unable_to_win() {
        let hand = cards(&["3♥", "9♥"]);
        let mut trick = Trick::new();
        trick.add_play(0, card("A♥")).unwrap();
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("3♥"));
    }

    #[test]
    fn ruffs_cheaply_when_void_in_led_suit() {
        let hand = cards(&["2♠", "9♠", "4♦"]);
        let mut trick = Trick::new();
        trick.add_play(0, card("A♥")).unwrap();
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("2♠"));
    }

    #[test]
    fn must_follow_suit_even_when_losing() {
        let hand = cards(&["2♥", "A♠"]);
        let mut trick = Trick::new();
        trick.add_play(0, card("K♥")).unwrap();
        // Holding a heart forces the heart, not the winning trump.
        assert_eq!(BasicAi.choose_card(&hand, &trick, Suit::Spades), card("2♥"));
    }
}
