//! Sink forwarding records into the `tracing` ecosystem
//!
//! Lets applications that already install a `tracing_subscriber` see
//! screenlog records alongside their own spans and events.

use screenlog_core::domain::{LogRecord, SinkLevel};
use screenlog_core::ports::ILogSink;

/// Emits every record as a `tracing` event under the `screenlog` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ILogSink for TracingSink {
    fn handle(&self, record: &LogRecord) -> anyhow::Result<()> {
        let context = serde_json::to_string(&record.context)?;
        let channel = record.channel.as_str();
        let sink_level = record.level.name();
        let report = record.report_filename();
        let report_created = record.report_created();
        let message = record.message.as_str();

        match record.level {
            SinkLevel::Debug => tracing::debug!(
                target: "screenlog",
                channel, sink_level, report, report_created, context = %context,
                "{message}"
            ),
            SinkLevel::Info | SinkLevel::Notice => tracing::info!(
                target: "screenlog",
                channel, sink_level, report, report_created, context = %context,
                "{message}"
            ),
            SinkLevel::Warning => tracing::warn!(
                target: "screenlog",
                channel, sink_level, report, report_created, context = %context,
                "{message}"
            ),
            SinkLevel::Error | SinkLevel::Critical | SinkLevel::Alert | SinkLevel::Emergency => {
                tracing::error!(
                    target: "screenlog",
                    channel, sink_level, report, report_created, context = %context,
                    "{message}"
                )
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use chrono::Local;
    use screenlog_core::domain::event::{CONTEXT_REPORT_CREATED, CONTEXT_REPORT_FILENAME};
    use screenlog_core::domain::Context;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Shared buffer collecting formatted subscriber output
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn record(level: SinkLevel, context: Context) -> LogRecord {
        LogRecord {
            level,
            message: format!("{level} message"),
            context,
            channel: "test".into(),
            datetime: Local::now(),
        }
    }

    fn emit(record: &LogRecord) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            TracingSink::new().handle(record).unwrap();
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_level_mapping() {
        let expected = [
            (SinkLevel::Debug, "DEBUG"),
            (SinkLevel::Info, "INFO"),
            (SinkLevel::Notice, "INFO"),
            (SinkLevel::Warning, "WARN"),
            (SinkLevel::Error, "ERROR"),
            (SinkLevel::Critical, "ERROR"),
            (SinkLevel::Alert, "ERROR"),
            (SinkLevel::Emergency, "ERROR"),
        ];
        for (level, tracing_level) in expected {
            let out = emit(&record(level, Context::new()));
            assert!(
                out.trim_start().starts_with(tracing_level),
                "{level} emitted as {out:?}"
            );
            assert!(out.contains("screenlog:"), "missing target in {out:?}");
            assert!(out.contains(&format!("{level} message")));
            assert!(out.contains(&format!("sink_level=\"{}\"", level.name())));
        }
    }

    #[test]
    fn test_report_fields_emitted() {
        let mut context = Context::new();
        context.insert(
            CONTEXT_REPORT_FILENAME.into(),
            "exception--2026-10-16--09-30--0123456789.html".into(),
        );
        context.insert(CONTEXT_REPORT_CREATED.into(), true.into());

        let out = emit(&record(SinkLevel::Critical, context));
        assert!(out.contains("report=\"exception--2026-10-16--09-30--0123456789.html\""));
        assert!(out.contains("report_created=true"));
        assert!(out.contains("channel=\"test\""));
    }

    #[test]
    fn test_report_fields_absent_without_report() {
        let out = emit(&record(SinkLevel::Info, Context::new()));
        assert!(!out.contains("report="));
        assert!(!out.contains("report_created="));
    }
}
