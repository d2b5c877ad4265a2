pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{split_rounds, TraceAssertion};
#[allow(unused_imports)]
pub use mocks::{FailingTraceSink, RejectingTraceSink};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
