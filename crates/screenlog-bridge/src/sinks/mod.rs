//! Sink adapters
//!
//! - [`TracingSink`] - forwards records as `tracing` events
//! - [`RotatingFileSink`] - JSON lines, one file per day

pub mod rotating_file;
pub mod tracing_sink;

pub use rotating_file::RotatingFileSink;
pub use tracing_sink::TracingSink;
