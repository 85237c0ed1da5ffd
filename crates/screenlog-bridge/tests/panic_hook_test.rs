//! Integration test: panics are reported through the installed hook
//!
//! Lives in its own test binary because the panic hook is process-wide.

use std::fs;
use std::sync::{Arc, Mutex};

use screenlog_bridge::{install_panic_hook, Logger};
use screenlog_core::domain::{LogRecord, SinkLevel};
use screenlog_core::ports::ILogSink;
use screenlog_report::{BlueScreenRenderer, ExceptionProcessor, ExceptionReportStore};

#[derive(Default)]
struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl ILogSink for MemorySink {
    fn handle(&self, record: &LogRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[test]
fn test_panic_is_logged_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(MemorySink::default());
    let store = ExceptionReportStore::new(dir.path(), Arc::new(BlueScreenRenderer::default()));
    let logger = Arc::new(
        Logger::builder("app")
            .push_processor(Arc::new(ExceptionProcessor::new(Arc::new(store))))
            .push_sink(sink.clone())
            .build(),
    );
    install_panic_hook(logger);

    let result = std::panic::catch_unwind(|| {
        panic!("worker exploded");
    });
    assert!(result.is_err());

    let records = sink.records.lock().unwrap().clone();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level, SinkLevel::Critical);
    assert!(record.message.starts_with("panic: worker exploded in "));
    assert!(record.message.contains("panic_hook_test.rs"));
    assert_eq!(record.report_created(), Some(true));

    let filename = record.report_filename().unwrap();
    let html = fs::read_to_string(dir.path().join(filename)).unwrap();
    assert!(html.contains("worker exploded"));
}
