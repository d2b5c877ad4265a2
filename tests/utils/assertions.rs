//! Trace assertion helpers - replay a recorded round and check its invariants
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::collections::{BTreeMap, VecDeque};

use cardgame::{Card, PlayerId, TraceEvent};

// ============================================================================
// Round Splitting
// ============================================================================

/// Groups events by round, from each `RoundStarted` through its `RoundFinished`
pub fn split_rounds(events: &[TraceEvent]) -> Vec<Vec<TraceEvent>> {
    let mut rounds = Vec::new();
    let mut current: Option<Vec<TraceEvent>> = None;

    for event in events {
        match event {
            TraceEvent::RoundStarted { .. } => {
                assert!(current.is_none(), "round started before previous finished");
                current = Some(vec![event.clone()]);
            }
            TraceEvent::RoundFinished { .. } => {
                let mut round = current.take().expect("round finished without start");
                round.push(event.clone());
                rounds.push(round);
            }
            _ => current
                .as_mut()
                .expect("event outside of a round")
                .push(event.clone()),
        }
    }

    assert!(current.is_none(), "last round never finished");
    rounds
}

// ============================================================================
// Round Assertions
// ============================================================================

pub struct TraceAssertion<'a> {
    events: &'a [TraceEvent],
    total_cards: usize,
}

impl<'a> TraceAssertion<'a> {
    pub fn for_round(events: &'a [TraceEvent], total_cards: usize) -> Self {
        Self {
            events,
            total_cards,
        }
    }

    fn position(&self, predicate: impl Fn(&TraceEvent) -> bool) -> Option<usize> {
        self.events.iter().position(predicate)
    }

    fn last_position(&self, predicate: impl Fn(&TraceEvent) -> bool) -> Option<usize> {
        self.events.iter().rposition(predicate)
    }

    /// Every deal happens before any player looks at their hand
    pub fn dealt_before_play(&self) -> &Self {
        let shuffling = self
            .position(|e| matches!(e, TraceEvent::DealerShuffling))
            .expect("dealer never shuffled");
        let shuffled = self
            .position(|e| matches!(e, TraceEvent::DeckShuffled { .. }))
            .expect("dealer never reported the deck");
        let last_deal = self
            .last_position(|e| matches!(e, TraceEvent::Dealt { .. }))
            .expect("dealer never dealt");
        let first_turn = self
            .position(|e| matches!(e, TraceEvent::Hand { .. }))
            .expect("no player took a turn");

        assert!(shuffling < last_deal, "deal reported before shuffle");
        assert!(last_deal < shuffled, "deck reported before dealing finished");
        assert!(shuffled < first_turn, "player acted before the dealer finished");
        self
    }

    /// Exactly one player exits as winner, and their last hand was a pair
    pub fn single_winner(&self) -> PlayerId {
        let winners: Vec<(usize, PlayerId)> = self
            .events
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                TraceEvent::Exit { player, won: true } => Some((i, *player)),
                _ => None,
            })
            .collect();
        assert_eq!(winners.len(), 1, "expected exactly one winner: {:?}", winners);
        let (exit_index, winner) = winners[0];

        let last_hand = self.events[..exit_index]
            .iter()
            .rev()
            .find_map(|e| match e {
                TraceEvent::Hand { player, cards } if *player == winner => Some(cards.clone()),
                _ => None,
            })
            .expect("winner never showed a hand");
        assert_eq!(last_hand.len(), 2, "winner must hold two cards");
        assert_eq!(last_hand[0], last_hand[1], "winner must hold a pair");

        let exits = self
            .events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Exit { .. }))
            .count();
        let dealt = self
            .events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Dealt { .. }))
            .count();
        assert_eq!(exits, dealt, "every dealt player must exit the round");

        winner
    }

    /// Replays draws and discards against a model of the deck and hands and
    /// checks the recorded state matches it after every event
    pub fn conserves_cards(&self) -> &Self {
        let mut hands: BTreeMap<PlayerId, Vec<Card>> = BTreeMap::new();
        let mut deck: Option<VecDeque<Card>> = None;
        let mut last_discard: Option<Card> = None;

        for event in self.events {
            match event {
                TraceEvent::Dealt { player, card } => {
                    hands.insert(*player, vec![*card]);
                }
                TraceEvent::DeckShuffled { deck: cards } => {
                    deck = Some(cards.iter().copied().collect());
                }
                TraceEvent::Draw { player, card } => {
                    let deck = deck.as_mut().expect("draw before deck was shuffled");
                    assert_eq!(deck.pop_front(), Some(*card), "draw must take the front card");
                    let hand = hands.get_mut(player).expect("draw by undealt player");
                    hand.push(*card);
                    assert!(hand.len() <= 2, "hand grew past two cards");
                }
                TraceEvent::Discard { player, card } => {
                    let hand = hands.get_mut(player).expect("discard by undealt player");
                    let index = hand
                        .iter()
                        .position(|held| held == card)
                        .expect("discarded a card not held");
                    hand.remove(index);
                    deck.as_mut()
                        .expect("discard before deck was shuffled")
                        .push_back(*card);
                    last_discard = Some(*card);
                }
                TraceEvent::DeckSnapshot { deck: cards } => {
                    let model = deck.as_ref().expect("snapshot before deck was shuffled");
                    assert_eq!(
                        cards,
                        &model.iter().copied().collect::<Vec<_>>(),
                        "deck snapshot disagrees with replay"
                    );
                    assert_eq!(cards.last(), last_discard.as_ref(), "discard must be at the back");
                }
                TraceEvent::Hand { player, cards } => {
                    let mut shown = cards.clone();
                    shown.sort();
                    let mut model = hands.get(player).cloned().unwrap_or_default();
                    model.sort();
                    assert_eq!(shown, model, "hand of player {} disagrees with replay", player);
                }
                _ => {}
            }

            if let Some(deck) = &deck {
                let held: usize = hands.values().map(Vec::len).sum();
                assert_eq!(
                    deck.len() + held,
                    self.total_cards,
                    "conservation broken at {:?}",
                    event
                );
            }
        }

        self
    }

    /// Player turns recorded in this round
    pub fn turn_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Draw { .. }))
            .count()
    }
}
