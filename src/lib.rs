// Library crate for the pair-drawing card game simulation
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod game;
pub mod shared;
pub mod trace;

// Re-export commonly used types for easier access in tests
pub use config::{ConfigError, SimulationConfig};
pub use game::{Card, DeckComposition, PlayerId, RoundOrchestrator, RoundSummary, RunReport};
pub use shared::SimulationError;
pub use trace::{FileTraceSink, InMemoryTraceSink, TraceEvent, TraceFormat, TraceSink};
