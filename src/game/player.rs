use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;
use tracing::{debug, info, instrument};

use super::round::RoundContext;
use crate::shared::SimulationError;
use crate::trace::TraceEvent;

/// Stable player identity, 1-based, kept for the whole run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PlayerState {
    WaitingForDeal,
    Playing,
    Won,
    Lost,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOutcome {
    pub id: PlayerId,
    pub won: bool,
    /// Turns this player took in the round
    pub turns: usize,
}

/// One player's worker for a single round.
///
/// The worker waits at the round gate, then takes whole turns under the table
/// lock until it either forms a pair or sees that someone else already has.
pub struct Player {
    id: PlayerId,
    state: PlayerState,
    turns: usize,
    ctx: RoundContext,
}

impl Player {
    pub fn new(id: PlayerId, ctx: RoundContext) -> Self {
        Self {
            id,
            state: PlayerState::WaitingForDeal,
            turns: 0,
            ctx,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[instrument(skip(self), fields(round = self.ctx.round, player = %self.id))]
    pub async fn run(mut self) -> Result<PlayerOutcome, SimulationError> {
        let mut won = false;

        loop {
            let next = match self.state {
                PlayerState::WaitingForDeal => {
                    self.ctx.gate.pass().await?;
                    PlayerState::Playing
                }
                PlayerState::Playing => self.take_turn().await?,
                PlayerState::Won | PlayerState::Lost => {
                    won = self.state == PlayerState::Won;
                    self.ctx
                        .trace(TraceEvent::Exit {
                            player: self.id,
                            won,
                        })
                        .await?;
                    PlayerState::Done
                }
                PlayerState::Done => break,
            };
            self.transition(next);
        }

        Ok(PlayerOutcome {
            id: self.id,
            won,
            turns: self.turns,
        })
    }

    fn transition(&mut self, next: PlayerState) {
        if next != self.state {
            debug!(from = %self.state, to = %next, "Player state change");
        }
        self.state = next;
    }

    /// One whole turn. The guard covers the winner check, the draw, the win
    /// claim and the discard, so turns never interleave.
    async fn take_turn(&mut self) -> Result<PlayerState, SimulationError> {
        let table = self.ctx.table.clone();
        let mut state = table.lock().await;

        if state.winner().is_set() {
            return Ok(PlayerState::Lost);
        }
        if let Some(limit) = self.ctx.max_turns {
            if state.turns() >= limit {
                return Err(SimulationError::TurnLimitExceeded {
                    round: self.ctx.round,
                    limit,
                });
            }
        }
        state.record_turn();
        self.turns += 1;

        let player = self.id;
        self.ctx
            .trace(TraceEvent::Hand {
                player,
                cards: state.hand(player)?.held(),
            })
            .await?;

        let card = state.draw_into(player)?;
        let hand = *state.hand(player)?;
        self.ctx.trace(TraceEvent::Draw { player, card }).await?;
        self.ctx
            .trace(TraceEvent::Hand {
                player,
                cards: hand.held(),
            })
            .await?;
        info!(player = %player, hand = %hand, "Player hand");

        if hand.is_pair() {
            state.claim_win(player)?;
            state.check_conservation()?;
            info!(player = %player, win = "yes", "Player formed a pair");
            return Ok(PlayerState::Won);
        }
        info!(player = %player, win = "no", "Player has no pair");

        let slot = state.choose_discard_slot();
        let discarded = state.discard_from(player, slot)?;
        self.ctx
            .trace(TraceEvent::Discard {
                player,
                card: discarded,
            })
            .await?;
        self.ctx
            .trace(TraceEvent::Hand {
                player,
                cards: state.hand(player)?.held(),
            })
            .await?;
        self.ctx
            .trace(TraceEvent::DeckSnapshot {
                deck: state.deck().contents(),
            })
            .await?;
        debug!(deck = %state.deck(), "Deck after discard");

        state.check_conservation()?;
        Ok(PlayerState::Playing)
    }
}
