use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{Card, PlayerId};

/// Things that happened during a run, in the order they happened.
///
/// The core hands these to a `TraceSink` already assembled; how they end up
/// on disk is the sink's concern. `Display` gives the classic one-line text
/// form of each event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A new round is about to be dealt
    RoundStarted { round: usize },

    /// The dealer has started preparing the round
    DealerShuffling,

    /// The dealer put the opening card into a player's hand
    Dealt { player: PlayerId, card: Card },

    /// The deck as it stands once every player has been dealt
    DeckShuffled { deck: Vec<Card> },

    /// The cards a player currently holds
    Hand { player: PlayerId, cards: Vec<Card> },

    Draw { player: PlayerId, card: Card },

    Discard { player: PlayerId, card: Card },

    /// The deck right after a discard
    DeckSnapshot { deck: Vec<Card> },

    /// A player left the round, either as the winner or not
    Exit { player: PlayerId, won: bool },

    /// Every worker of the round has finished
    RoundFinished { round: usize },
}

impl TraceEvent {
    /// The player this event is about, if any
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            TraceEvent::Dealt { player, .. }
            | TraceEvent::Hand { player, .. }
            | TraceEvent::Draw { player, .. }
            | TraceEvent::Discard { player, .. }
            | TraceEvent::Exit { player, .. } => Some(*player),
            TraceEvent::RoundStarted { .. }
            | TraceEvent::DealerShuffling
            | TraceEvent::DeckShuffled { .. }
            | TraceEvent::DeckSnapshot { .. }
            | TraceEvent::RoundFinished { .. } => None,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            TraceEvent::RoundStarted { .. } => "round_started",
            TraceEvent::DealerShuffling => "dealer_shuffling",
            TraceEvent::Dealt { .. } => "dealt",
            TraceEvent::DeckShuffled { .. } => "deck_shuffled",
            TraceEvent::Hand { .. } => "hand",
            TraceEvent::Draw { .. } => "draw",
            TraceEvent::Discard { .. } => "discard",
            TraceEvent::DeckSnapshot { .. } => "deck_snapshot",
            TraceEvent::Exit { .. } => "exit",
            TraceEvent::RoundFinished { .. } => "round_finished",
        }
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::RoundStarted { round } => write!(f, "ROUND {}", round),
            TraceEvent::DealerShuffling => write!(f, "Dealer: Shuffling cards..."),
            TraceEvent::Dealt { player, card } => {
                write!(f, "Dealer: deals {} to PLAYER {}", card, player)
            }
            TraceEvent::DeckShuffled { deck } | TraceEvent::DeckSnapshot { deck } => {
                write!(f, "DECK: {}", join_cards(deck))
            }
            TraceEvent::Hand { player, cards } => {
                write!(f, "PLAYER {}: hand {}", player, join_cards(cards))
            }
            TraceEvent::Draw { player, card } => write!(f, "PLAYER {}: draws {}", player, card),
            TraceEvent::Discard { player, card } => {
                write!(f, "PLAYER {}: discards {}", player, card)
            }
            TraceEvent::Exit { player, won: true } => {
                write!(f, "PLAYER {}: wins and exits round", player)
            }
            TraceEvent::Exit { player, won: false } => write!(f, "PLAYER {}: exits round", player),
            // Blank separator line between rounds
            TraceEvent::RoundFinished { .. } => Ok(()),
        }
    }
}
