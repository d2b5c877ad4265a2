use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::cards::{Card, CardError, Deck, DeckComposition, Hand, Slot};
use super::player::PlayerId;
use crate::shared::SimulationError;

/// Records which player, if any, has won the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinnerFlag(Option<PlayerId>);

impl WinnerFlag {
    pub fn reset(&mut self) {
        self.0 = None;
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.0
    }

    /// Sets the flag. A second claim by a different player is an invariant
    /// violation; the flag keeps its first value.
    pub fn claim(&mut self, player: PlayerId) -> Result<(), SimulationError> {
        match self.0 {
            Some(existing) if existing != player => Err(SimulationError::WinnerAlreadyClaimed {
                existing,
                claimant: player,
            }),
            _ => {
                self.0 = Some(player);
                Ok(())
            }
        }
    }
}

/// Everything a round mutates: the deck, the winner flag, every hand and the
/// random source. Only reachable through the table lock.
#[derive(Debug)]
pub struct TableState {
    deck: Deck,
    winner: WinnerFlag,
    hands: BTreeMap<PlayerId, Hand>,
    composition: DeckComposition,
    rng: StdRng,
    turns: usize,
}

impl TableState {
    pub fn new(players: &[PlayerId], composition: DeckComposition, rng: StdRng) -> Self {
        Self {
            deck: Deck::new(),
            winner: WinnerFlag::default(),
            hands: players.iter().map(|&id| (id, Hand::new())).collect(),
            composition,
            rng,
            turns: 0,
        }
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.hands.keys().copied().collect()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn winner(&self) -> WinnerFlag {
        self.winner
    }

    pub fn composition(&self) -> &DeckComposition {
        &self.composition
    }

    pub fn hand(&self, player: PlayerId) -> Result<&Hand, SimulationError> {
        self.hands
            .get(&player)
            .ok_or(SimulationError::UnknownPlayer(player))
    }

    fn hand_mut(&mut self, player: PlayerId) -> Result<&mut Hand, SimulationError> {
        self.hands
            .get_mut(&player)
            .ok_or(SimulationError::UnknownPlayer(player))
    }

    /// Clears the winner flag and the per-round turn counter.
    pub fn reset_round(&mut self) {
        self.winner.reset();
        self.turns = 0;
    }

    /// Refills the deck from the composition in a fresh random order and
    /// empties every hand, so all cards are back in the deck.
    pub fn refill_deck(&mut self) {
        self.deck.shuffle_and_refill(&self.composition, &mut self.rng);
        for hand in self.hands.values_mut() {
            hand.reset();
        }
    }

    /// Empties the player's hand and deals it a single card into slot `a`.
    pub fn deal_to(&mut self, player: PlayerId) -> Result<Card, SimulationError> {
        self.hand_mut(player)?.reset();
        self.draw_into(player)
    }

    /// Moves the front card of the deck into the player's empty slot.
    pub fn draw_into(&mut self, player: PlayerId) -> Result<Card, SimulationError> {
        // Check the hand first so a full hand never costs the deck a card.
        if self.hand(player)?.len() >= 2 {
            return Err(CardError::HandFull.into());
        }
        let card = self.deck.draw().ok_or(SimulationError::EmptyDeck)?;
        self.hand_mut(player)?.fill_empty_slot(card)?;
        Ok(card)
    }

    /// Moves the card in `slot` to the back of the deck.
    pub fn discard_from(
        &mut self,
        player: PlayerId,
        slot: Slot,
    ) -> Result<Card, SimulationError> {
        let card = self.hand_mut(player)?.take(slot)?;
        self.deck.discard(card);
        Ok(card)
    }

    /// Picks one of the two slots with equal probability.
    pub fn choose_discard_slot(&mut self) -> Slot {
        if self.rng.random_bool(0.5) {
            Slot::A
        } else {
            Slot::B
        }
    }

    pub fn claim_win(&mut self, player: PlayerId) -> Result<(), SimulationError> {
        let hand = self.hand(player)?;
        if !hand.is_pair() {
            return Err(SimulationError::InvariantViolation(format!(
                "player {} claimed a win holding [{}]",
                player, hand
            )));
        }
        self.winner.claim(player)
    }

    pub fn record_turn(&mut self) -> usize {
        self.turns += 1;
        self.turns
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Cards in the deck plus cards held in every hand.
    pub fn cards_in_play(&self) -> usize {
        self.deck.len() + self.hands.values().map(Hand::len).sum::<usize>()
    }

    pub fn check_conservation(&self) -> Result<(), SimulationError> {
        let expected = self.composition.len();
        let found = self.cards_in_play();
        if found == expected {
            Ok(())
        } else {
            Err(SimulationError::ConservationViolated { expected, found })
        }
    }
}

/// Shared handle to the table state. Cloning shares the same state and lock.
#[derive(Debug, Clone)]
pub struct Table {
    state: Arc<Mutex<TableState>>,
}

impl Table {
    pub fn new(players: &[PlayerId], composition: DeckComposition, rng: StdRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(TableState::new(players, composition, rng))),
        }
    }

    /// Acquires the table lock. The guard releases it on every exit path.
    pub async fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().await
    }
}
