//! Log sink port (driven/secondary port)
//!
//! Sinks own storage, rotation and delivery of finalized records.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because failure modes are adapter-specific.
//! - The logger never propagates sink errors to its caller.

use crate::domain::LogRecord;

/// Accepts finalized log records
pub trait ILogSink: Send + Sync {
    /// Stores or forwards a single record.
    fn handle(&self, record: &LogRecord) -> anyhow::Result<()>;
}
