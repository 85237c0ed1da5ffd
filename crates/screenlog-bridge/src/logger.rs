//! Logger - call-site facade
//!
//! Builds a [`LogEvent`] at the call site (stamping the `at` context entry
//! with the caller's location), runs it through the registered processors,
//! translates its severity and hands the resulting [`LogRecord`] to every
//! sink. Events whose mapped level is below the logger's minimum are
//! dropped before any processor runs, so they never produce reports. Logging never fails from the caller's point of view: sink errors
//! are reported via `tracing::warn!` and swallowed.

use std::panic::Location;
use std::sync::Arc;

use screenlog_core::domain::error_value::MAX_CHAIN_DEPTH;
use screenlog_core::domain::event::{CONTEXT_AT, CONTEXT_EXCEPTION};
use screenlog_core::domain::{
    ErrorValue, LogEvent, LogMessage, LogRecord, Severity, SinkLevel,
};
use screenlog_core::ports::{ILogSink, IRecordProcessor};
use screenlog_report::format_chain;
use tracing::warn;

use crate::severity_map::SeverityMapper;

/// Logger facade over a processor chain and a set of sinks
pub struct Logger {
    channel: String,
    min_level: SinkLevel,
    processors: Vec<Arc<dyn IRecordProcessor>>,
    sinks: Vec<Arc<dyn ILogSink>>,
}

impl Logger {
    /// Starts a builder for a logger on `channel`.
    pub fn builder(channel: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(channel)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Lowest level passed to the sinks.
    pub fn min_level(&self) -> SinkLevel {
        self.min_level
    }

    /// Logs a text message or error value at `severity`.
    #[track_caller]
    pub fn log(&self, message: impl Into<LogMessage>, severity: Severity) {
        let location = Location::caller();
        let event = LogEvent::new(message, severity)
            .with_context(CONTEXT_AT, format!("{}:{}", location.file(), location.line()));
        self.log_event(event);
    }

    /// Logs a prepared event. An empty channel is replaced by this logger's.
    pub fn log_event(&self, mut event: LogEvent) {
        if SeverityMapper::map(event.severity) < self.min_level {
            return;
        }
        if event.channel.is_empty() {
            event.channel = self.channel.clone();
        }

        let event = self
            .processors
            .iter()
            .fold(event, |event, processor| processor.process(event));

        let record = to_record(event);
        for sink in &self.sinks {
            if let Err(e) = sink.handle(&record) {
                warn!(error = %e, channel = %record.channel, "Log sink failed");
            }
        }
    }

    /// Snapshots a Rust error (with its source chain) and logs it.
    #[track_caller]
    pub fn log_error<E>(&self, error: &E, severity: Severity)
    where
        E: std::error::Error + ?Sized,
    {
        let value = ErrorValue::from_error(error, Location::caller());
        self.log(value, severity);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<LogMessage>) {
        self.log(message, Severity::Debug);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<LogMessage>) {
        self.log(message, Severity::Info);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<LogMessage>) {
        self.log(message, Severity::Warning);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<LogMessage>) {
        self.log(message, Severity::Error);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<LogMessage>) {
        self.log(message, Severity::Critical);
    }

    /// Logs an error value at `Exception` severity.
    #[track_caller]
    pub fn exception(&self, error: ErrorValue) {
        self.log(error, Severity::Exception);
    }
}

/// Turns a processed event into a sink record.
///
/// An error message still present here (no exception processor installed)
/// is moved to the `exception` context entry and described by its chain.
fn to_record(event: LogEvent) -> LogRecord {
    let LogEvent {
        message,
        severity,
        mut context,
        channel,
        datetime,
    } = event;

    let message = match message {
        LogMessage::Text(text) => text,
        LogMessage::Error(error) => {
            let text = format_chain(&error, MAX_CHAIN_DEPTH);
            context.insert(CONTEXT_EXCEPTION.into(), error.into());
            text
        }
    };

    LogRecord {
        level: SeverityMapper::map(severity),
        message,
        context,
        channel,
        datetime,
    }
}

/// Builder for [`Logger`]
pub struct LoggerBuilder {
    channel: String,
    min_level: SinkLevel,
    processors: Vec<Arc<dyn IRecordProcessor>>,
    sinks: Vec<Arc<dyn ILogSink>>,
}

impl LoggerBuilder {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            min_level: SinkLevel::Debug,
            processors: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Drops events mapping below `level`. Defaults to [`SinkLevel::Debug`].
    pub fn min_level(mut self, level: SinkLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Appends a processor; processors run in push order.
    pub fn push_processor(mut self, processor: Arc<dyn IRecordProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Appends a sink.
    pub fn push_sink(mut self, sink: Arc<dyn ILogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            channel: self.channel,
            min_level: self.min_level,
            processors: self.processors,
            sinks: self.sinks,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use screenlog_core::domain::ContextValue;

    use super::*;

    /// In-memory sink that records every record it receives
    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<LogRecord>>,
    }

    impl MemorySink {
        fn records(&self) -> Vec<LogRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl ILogSink for MemorySink {
        fn handle(&self, record: &LogRecord) -> anyhow::Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl ILogSink for FailingSink {
        fn handle(&self, _record: &LogRecord) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    /// Tags every event so ordering can be observed
    struct Tagger(&'static str);

    impl IRecordProcessor for Tagger {
        fn process(&self, event: LogEvent) -> LogEvent {
            let trail = match event.context.get("trail").and_then(ContextValue::as_str) {
                Some(prev) => format!("{prev},{}", self.0),
                None => self.0.to_string(),
            };
            event.with_context("trail", trail)
        }
    }

    #[test]
    fn test_log_text_message() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("web").push_sink(sink.clone()).build();

        logger.warning("disk almost full");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level, SinkLevel::Warning);
        assert_eq!(record.message, "disk almost full");
        assert_eq!(record.channel, "web");
        let at = record.context.get(CONTEXT_AT).and_then(ContextValue::as_str).unwrap();
        assert!(at.contains("logger.rs:"), "unexpected call site {at}");
    }

    #[test]
    fn test_processors_run_in_order() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("app")
            .push_processor(Arc::new(Tagger("first")))
            .push_processor(Arc::new(Tagger("second")))
            .push_sink(sink.clone())
            .build();

        logger.info("hello");

        let records = sink.records();
        assert_eq!(
            records[0].context.get("trail"),
            Some(&ContextValue::Str("first,second".into()))
        );
    }

    #[test]
    fn test_error_without_processor_goes_to_context() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("app").push_sink(sink.clone()).build();
        let error = ErrorValue::new("A", "msg1", "f", 1)
            .with_previous(ErrorValue::new("B", "msg2", "f", 2));

        logger.exception(error.clone());

        let record = &sink.records()[0];
        assert_eq!(record.level, SinkLevel::Critical);
        assert_eq!(record.message, "A: msg1 in f:1\ncaused by B: msg2 in f:2");
        assert_eq!(
            record.context.get(CONTEXT_EXCEPTION),
            Some(&ContextValue::Error(error))
        );
    }

    #[test]
    fn test_min_level_drops_before_processors() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("app")
            .min_level(SinkLevel::Warning)
            .push_processor(Arc::new(Tagger("seen")))
            .push_sink(sink.clone())
            .build();

        logger.debug("noise");
        logger.info("chatter");
        logger.warning("kept");
        logger.exception(ErrorValue::new("A", "boom", "f", 1));

        let records = sink.records();
        let levels: Vec<SinkLevel> = records.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![SinkLevel::Warning, SinkLevel::Critical]);
        assert!(records.iter().all(|r| r.context.contains_key("trail")));
    }

    #[test]
    fn test_failing_sink_does_not_stop_others() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("app")
            .push_sink(Arc::new(FailingSink))
            .push_sink(sink.clone())
            .build();

        logger.error("still delivered");
        assert_eq!(sink.records().len(), 1);
    }

    #[test]
    fn test_log_error_snapshots_std_error() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("app").push_sink(sink.clone()).build();
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");

        logger.log_error(&err, Severity::Error);

        let record = &sink.records()[0];
        assert_eq!(record.level, SinkLevel::Error);
        assert!(record.message.starts_with("Error: access denied in "));
    }

    #[test]
    fn test_log_event_keeps_explicit_channel() {
        let sink = Arc::new(MemorySink::default());
        let logger = Logger::builder("app").push_sink(sink.clone()).build();

        logger.log_event(LogEvent::new("x", Severity::Debug).with_channel("jobs"));
        logger.log_event(LogEvent::new("y", Severity::Debug));

        let records = sink.records();
        assert_eq!(records[0].channel, "jobs");
        assert_eq!(records[1].channel, "app");
        assert!(records[1].context.get(CONTEXT_AT).is_none());
    }
}
