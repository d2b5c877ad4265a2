use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use super::dealer::Dealer;
use super::gate::RoundGate;
use super::player::{Player, PlayerOutcome};
use super::round::{RoundContext, RoundSummary, RunReport};
use super::table::Table;
use crate::config::SimulationConfig;
use crate::shared::SimulationError;
use crate::trace::{TraceEvent, TraceSink};

enum WorkerOutcome {
    Dealer,
    Player(PlayerOutcome),
}

/// Runs the configured number of rounds, one dealer and one worker per
/// player each round, and waits for all of them before moving on.
pub struct RoundOrchestrator {
    config: SimulationConfig,
    table: Table,
    sink: Arc<dyn TraceSink>,
}

impl RoundOrchestrator {
    pub fn new(
        config: SimulationConfig,
        sink: Arc<dyn TraceSink>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let table = Table::new(&config.player_ids(), config.composition.clone(), config.rng());

        Ok(Self {
            config,
            table,
            sink,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Plays every round, stopping at the first failure. The sink is flushed
    /// on every exit path; a round failure takes precedence over a flush
    /// failure.
    #[instrument(skip(self), fields(players = self.config.players, rounds = self.config.rounds))]
    pub async fn run(&self) -> Result<RunReport, SimulationError> {
        let started_at = Utc::now();
        let mut rounds = Vec::with_capacity(self.config.rounds);

        let played = self.play_rounds(&mut rounds).await;
        let flushed = self.sink.flush().await.map_err(SimulationError::from);
        played.and(flushed)?;

        Ok(RunReport {
            rounds,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn play_rounds(&self, rounds: &mut Vec<RoundSummary>) -> Result<(), SimulationError> {
        for round in 1..=self.config.rounds {
            rounds.push(self.play_round(round).await?);
        }
        Ok(())
    }

    /// Plays a single round to completion. The first worker that fails ends
    /// the round: the gate is closed, the other workers are aborted and the
    /// error is returned.
    #[instrument(skip(self))]
    pub async fn play_round(&self, round: usize) -> Result<RoundSummary, SimulationError> {
        self.sink.record(TraceEvent::RoundStarted { round }).await?;
        info!(round, "Round starting");

        let ctx = RoundContext {
            round,
            table: self.table.clone(),
            gate: Arc::new(RoundGate::new()),
            sink: self.sink.clone(),
            max_turns: self.config.max_turns_per_round,
        };

        let mut workers = JoinSet::new();
        for id in self.config.player_ids() {
            let player = Player::new(id, ctx.clone());
            workers.spawn(async move { player.run().await.map(WorkerOutcome::Player) });
        }
        let dealer = Dealer::new(ctx.clone());
        workers.spawn(async move { dealer.run().await.map(|()| WorkerOutcome::Dealer) });

        let mut outcomes = Vec::with_capacity(self.config.players);
        while let Some(joined) = workers.join_next().await {
            match joined.map_err(SimulationError::from).and_then(|result| result) {
                Ok(WorkerOutcome::Player(outcome)) => outcomes.push(outcome),
                Ok(WorkerOutcome::Dealer) => {}
                Err(e) => {
                    error!(round, error = %e, "Round worker failed");
                    ctx.gate.close();
                    workers.abort_all();
                    return Err(Self::root_cause(e, &mut workers).await);
                }
            }
        }
        outcomes.sort_by_key(|outcome| outcome.id);

        let (winner, turns) = {
            let state = self.table.lock().await;
            let winner = state.winner().winner().ok_or_else(|| {
                SimulationError::InvariantViolation(format!(
                    "round {} ended without a winner",
                    round
                ))
            })?;
            (winner, state.turns())
        };

        let claimed: Vec<_> = outcomes.iter().filter(|outcome| outcome.won).collect();
        if claimed.len() != 1 || claimed[0].id != winner {
            return Err(SimulationError::InvariantViolation(format!(
                "round {} winner flag says player {} but {} players reported a win",
                round,
                winner,
                claimed.len()
            )));
        }

        self.sink.record(TraceEvent::RoundFinished { round }).await?;
        info!(round, winner = %winner, turns, "Round finished");

        Ok(RoundSummary {
            round,
            winner,
            turns,
            outcomes,
        })
    }

    /// Drains the aborted workers and picks the failure that started it all.
    /// Players woken by the closed gate and cancelled tasks only report
    /// knock-on errors.
    async fn root_cause(
        first: SimulationError,
        workers: &mut JoinSet<Result<WorkerOutcome, SimulationError>>,
    ) -> SimulationError {
        let mut cause = first;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined.map_err(SimulationError::from).and_then(|result| result) {
                if cause.is_knock_on() && !e.is_knock_on() {
                    cause = e;
                }
            }
        }
        cause
    }
}
