use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::hand::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("Invalid card rank: {0} (expected 1..=13)")]
    InvalidRank(u8),
    #[error("Hand already holds two cards")]
    HandFull,
    #[error("Hand slot {0} is empty")]
    SlotEmpty(Slot),
}

/// A card is only its rank; suits are not modeled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 13;

    pub fn new(rank: u8) -> Result<Self, CardError> {
        if (Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) {
            Ok(Self(rank))
        } else {
            Err(CardError::InvalidRank(rank))
        }
    }

    pub fn rank(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Card {
    type Error = CardError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        Card::new(rank)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The multiset of cards a round starts from.
///
/// Its size is the conservation total: deck plus every hand always adds up
/// to `len()` while a round is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckComposition {
    cards: Vec<Card>,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self::standard()
    }
}

impl DeckComposition {
    pub const SUITS: usize = 4;

    /// Four copies of every rank, 52 cards in rank order.
    pub fn standard() -> Self {
        let cards = (0..Self::SUITS)
            .flat_map(|_| (Card::MIN_RANK..=Card::MAX_RANK).map(Card))
            .collect();
        Self { cards }
    }

    pub fn from_ranks(ranks: &[u8]) -> Result<Self, CardError> {
        let cards = ranks
            .iter()
            .map(|&rank| Card::new(rank))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// A round can only terminate if at least one rank appears twice.
    pub fn has_pair(&self) -> bool {
        let mut counts: HashMap<Card, usize> = HashMap::new();
        self.cards.iter().any(|card| {
            let count = counts.entry(*card).or_default();
            *count += 1;
            *count >= 2
        })
    }
}
