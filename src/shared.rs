use thiserror::Error;
use tokio::task::JoinError;

use crate::config::ConfigError;
use crate::game::{CardError, GateError, PlayerId};
use crate::trace::TraceError;

/// Every way a run can fail. All of them are fatal: the simulation has no
/// retries and no partial-round recovery.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Round gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("Worker task failed: {0}")]
    Worker(#[from] JoinError),

    #[error("Deck was empty on draw")]
    EmptyDeck,

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {claimant} tried to win a round already won by player {existing}")]
    WinnerAlreadyClaimed {
        existing: PlayerId,
        claimant: PlayerId,
    },

    #[error("Card conservation violated: expected {expected} cards in play, found {found}")]
    ConservationViolated { expected: usize, found: usize },

    #[error("Round {round} exceeded the limit of {limit} turns")]
    TurnLimitExceeded { round: usize, limit: usize },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl SimulationError {
    /// True for failures that only happen because another worker failed
    /// first: a player woken by a closed gate, or a cancelled task.
    pub fn is_knock_on(&self) -> bool {
        match self {
            SimulationError::Gate(GateError::Closed) => true,
            SimulationError::Worker(e) => e.is_cancelled(),
            _ => false,
        }
    }
}
