use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

use super::basic::{Card, DeckComposition};

/// Shared draw pile. Cards leave from the front and come back at the back.
///
/// Not synchronized on its own; it lives inside the table state and is only
/// touched while the table lock is held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a deck in exactly the given order, front first.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn discard(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Replaces the contents with `composition` in a uniformly random order.
    pub fn shuffle_and_refill<R: Rng + ?Sized>(
        &mut self,
        composition: &DeckComposition,
        rng: &mut R,
    ) {
        let mut cards = composition.cards().to_vec();
        cards.shuffle(rng);
        self.cards = cards.into();
    }

    pub fn contents(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }

    pub fn back(&self) -> Option<Card> {
        self.cards.back().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(Card::to_string).collect();
        write!(f, "{}", cards.join(" "))
    }
}
