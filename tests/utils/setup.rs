use std::sync::Arc;

use cardgame::{
    DeckComposition, InMemoryTraceSink, RoundOrchestrator, RunReport, SimulationConfig,
    SimulationError,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub orchestrator: RoundOrchestrator,
    pub sink: Arc<InMemoryTraceSink>,
}

impl TestSetup {
    pub async fn run(&self) -> Result<RunReport, SimulationError> {
        self.orchestrator.run().await
    }
}

pub struct TestSetupBuilder {
    config: SimulationConfig,
}

impl TestSetupBuilder {
    /// Reference parameters with a fixed seed so failures can be replayed
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default().with_seed(2024),
        }
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.config = self.config.with_players(players);
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.config = self.config.with_rounds(rounds);
        self
    }

    pub fn with_ranks(mut self, ranks: &[u8]) -> Self {
        let composition = DeckComposition::from_ranks(ranks).expect("test ranks must be valid");
        self.config = self.config.with_composition(composition);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.config = self.config.with_max_turns(max_turns);
        self
    }

    pub fn build(self) -> TestSetup {
        let sink = Arc::new(InMemoryTraceSink::new());
        let orchestrator =
            RoundOrchestrator::new(self.config, sink.clone()).expect("test config must be valid");
        TestSetup { orchestrator, sink }
    }
}
