use tracing::{debug, info, instrument, warn};

use super::round::RoundContext;
use crate::shared::SimulationError;
use crate::trace::TraceEvent;

/// Prepares a round and then lets the players in.
///
/// Holds no state of its own; a fresh dealer runs at the start of every round.
pub struct Dealer {
    ctx: RoundContext,
}

impl Dealer {
    pub fn new(ctx: RoundContext) -> Self {
        Self { ctx }
    }

    /// Deals the round and opens the gate. On failure the gate is closed
    /// instead, so no player is left waiting for a deal that never comes.
    #[instrument(skip(self), fields(round = self.ctx.round))]
    pub async fn run(self) -> Result<(), SimulationError> {
        match self.deal().await {
            Ok(passes) => {
                self.ctx.gate.open(passes)?;
                debug!(passes, "Players released");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Dealing failed, closing round gate");
                self.ctx.gate.close();
                Err(e)
            }
        }
    }

    async fn deal(&self) -> Result<usize, SimulationError> {
        let mut state = self.ctx.table.lock().await;
        self.ctx.trace(TraceEvent::DealerShuffling).await?;

        state.reset_round();
        state.refill_deck();

        let players = state.player_ids();
        for &player in &players {
            let card = state.deal_to(player)?;
            self.ctx.trace(TraceEvent::Dealt { player, card }).await?;
        }

        state.check_conservation()?;
        self.ctx
            .trace(TraceEvent::DeckShuffled {
                deck: state.deck().contents(),
            })
            .await?;
        info!(deck = %state.deck(), "Dealer shuffled and dealt");

        Ok(players.len())
    }
}
