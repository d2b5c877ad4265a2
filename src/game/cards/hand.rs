use serde::{Deserialize, Serialize};
use std::fmt;

use super::basic::{Card, CardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::A => write!(f, "a"),
            Slot::B => write!(f, "b"),
        }
    }
}

/// A player's hand: two slots, each empty or holding one card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hand {
    slot_a: Option<Card>,
    slot_b: Option<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.slot_a = None;
        self.slot_b = None;
    }

    pub fn slot(&self, slot: Slot) -> Option<Card> {
        match slot {
            Slot::A => self.slot_a,
            Slot::B => self.slot_b,
        }
    }

    /// Puts `card` into the first empty slot, `a` before `b`.
    pub fn fill_empty_slot(&mut self, card: Card) -> Result<Slot, CardError> {
        if self.slot_a.is_none() {
            self.slot_a = Some(card);
            Ok(Slot::A)
        } else if self.slot_b.is_none() {
            self.slot_b = Some(card);
            Ok(Slot::B)
        } else {
            Err(CardError::HandFull)
        }
    }

    pub fn take(&mut self, slot: Slot) -> Result<Card, CardError> {
        let held = match slot {
            Slot::A => &mut self.slot_a,
            Slot::B => &mut self.slot_b,
        };
        held.take().ok_or(CardError::SlotEmpty(slot))
    }

    /// Held cards in slot order.
    pub fn held(&self) -> Vec<Card> {
        self.slot_a.into_iter().chain(self.slot_b).collect()
    }

    pub fn len(&self) -> usize {
        usize::from(self.slot_a.is_some()) + usize::from(self.slot_b.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_pair(&self) -> bool {
        matches!((self.slot_a, self.slot_b), (Some(a), Some(b)) if a == b)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held: Vec<String> = self.held().iter().map(Card::to_string).collect();
        write!(f, "{}", held.join(" "))
    }
}
