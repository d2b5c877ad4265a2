use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::gate::RoundGate;
use super::player::{PlayerId, PlayerOutcome};
use super::table::Table;
use crate::shared::SimulationError;
use crate::trace::{TraceEvent, TraceSink};

/// What every worker of one round shares. Cloning is cheap; all handles point
/// at the same table, gate and sink.
#[derive(Clone)]
pub struct RoundContext {
    pub round: usize,
    pub table: Table,
    pub gate: Arc<RoundGate>,
    pub sink: Arc<dyn TraceSink>,
    pub max_turns: Option<usize>,
}

impl RoundContext {
    pub async fn trace(&self, event: TraceEvent) -> Result<(), SimulationError> {
        self.sink.record(event).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: usize,
    pub winner: PlayerId,
    /// Player turns taken across the whole table
    pub turns: usize,
    pub outcomes: Vec<PlayerOutcome>,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub rounds: Vec<RoundSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn winners(&self) -> Vec<PlayerId> {
        self.rounds.iter().map(|round| round.winner).collect()
    }
}
