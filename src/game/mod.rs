// Public API
pub use cards::{Card, CardError, Deck, DeckComposition, Hand, Slot};
pub use dealer::Dealer;
pub use gate::{GateError, RoundGate};
pub use orchestrator::RoundOrchestrator;
pub use player::{Player, PlayerId, PlayerOutcome, PlayerState};
pub use round::{RoundContext, RoundSummary, RunReport};
pub use table::{Table, TableState, WinnerFlag};

// Internal modules
mod cards;
mod dealer;
mod gate;
mod orchestrator;
mod player;
mod round;
mod table;
