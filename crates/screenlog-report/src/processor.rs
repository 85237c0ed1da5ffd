//! Record processor attaching exception reports to error events

use std::sync::Arc;

use screenlog_core::domain::LogEvent;
use screenlog_core::ports::IRecordProcessor;

use crate::store::ExceptionReportStore;

/// Runs [`ExceptionReportStore::record_if_error`] on every event.
pub struct ExceptionProcessor {
    store: Arc<ExceptionReportStore>,
}

impl ExceptionProcessor {
    pub fn new(store: Arc<ExceptionReportStore>) -> Self {
        Self { store }
    }

    /// The underlying report store.
    pub fn store(&self) -> &ExceptionReportStore {
        &self.store
    }
}

impl IRecordProcessor for ExceptionProcessor {
    fn process(&self, event: LogEvent) -> LogEvent {
        self.store.record_if_error(event)
    }
}
