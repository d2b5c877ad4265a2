pub mod basic;
pub mod deck;
pub mod hand;

pub use basic::{Card, CardError, DeckComposition};
pub use deck::Deck;
pub use hand::{Hand, Slot};
