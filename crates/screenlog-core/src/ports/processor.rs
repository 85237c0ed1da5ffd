//! Record processor port
//!
//! Processors run in registration order on every event before severity
//! translation. They take the event by value and return the (possibly
//! rewritten) event; they have no way to drop it or fail.

use crate::domain::LogEvent;

/// Rewrites an event on its way to the sinks
pub trait IRecordProcessor: Send + Sync {
    fn process(&self, event: LogEvent) -> LogEvent;
}
