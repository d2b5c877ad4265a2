// Round tracing
//
// The game core reports what happens through `TraceEvent`s handed to a
// `TraceSink`. The sink decides where the lines go.

// Public API - what other modules can use
pub use events::TraceEvent;
pub use sink::{FileTraceSink, InMemoryTraceSink, TraceError, TraceFormat, TraceSink};

// Internal modules
mod events;
mod sink;
