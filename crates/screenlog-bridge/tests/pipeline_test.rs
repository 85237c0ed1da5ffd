//! Integration test: Logger → ExceptionProcessor → report files → sinks
//!
//! Uses a real temporary log directory and an in-memory sink to verify the
//! records an application would see.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use screenlog_bridge::{from_config, Logger};
use screenlog_core::config::ConfigBuilder;
use screenlog_core::domain::{ErrorValue, LogRecord, Severity, SinkLevel};
use screenlog_core::ports::ILogSink;
use screenlog_report::{BlueScreenRenderer, ExceptionProcessor, ExceptionReportStore};

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

fn make_logger(dir: &Path) -> (Logger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let store = ExceptionReportStore::new(dir, Arc::new(BlueScreenRenderer::default()));
    let logger = Logger::builder("app")
        .push_processor(Arc::new(ExceptionProcessor::new(Arc::new(store))))
        .push_sink(sink.clone())
        .build();
    (logger, sink)
}

fn report_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("exception--") && n.ends_with(".html"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_error_event_produces_report_and_record() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, sink) = make_logger(dir.path());

    let error = ErrorValue::new("A", "msg1", "f", 1)
        .with_previous(ErrorValue::new("B", "msg2", "f", 2));
    logger.log(error, Severity::Exception);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level, SinkLevel::Critical);
    assert_eq!(record.message, "A: msg1 in f:1\ncaused by B: msg2 in f:2");
    assert_eq!(record.report_created(), Some(true));

    let files = report_files(dir.path());
    assert_eq!(files.len(), 1);
    assert_eq!(record.report_filename(), Some(files[0].as_str()));
    assert!(!fs::read_to_string(dir.path().join(&files[0])).unwrap().is_empty());

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["context"]["exception"]["kind"], "A");
    assert_eq!(json["context"]["tracy_created"], true);
    assert!(json["context"]["at"].as_str().unwrap().contains("pipeline_test.rs"));
}

#[test]
fn test_repeated_error_reuses_report() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, sink) = make_logger(dir.path());

    for _ in 0..3 {
        logger.exception(ErrorValue::new("DbError", "Resource id #17 closed", "src/db.rs", 9));
    }
    // Same failure, different handle number.
    logger.exception(ErrorValue::new("DbError", "Resource id #4 closed", "src/db.rs", 9));

    let records = sink.records();
    let created: Vec<Option<bool>> = records.iter().map(LogRecord::report_created).collect();
    assert_eq!(created, vec![Some(true), Some(false), Some(false), Some(false)]);
    let first = records[0].report_filename();
    assert!(records.iter().all(|r| r.report_filename() == first));
    assert_eq!(report_files(dir.path()).len(), 1);
}

#[test]
fn test_text_events_do_not_touch_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (logger, sink) = make_logger(dir.path());

    logger.info("service started");
    logger.log("odd", Severity::Warning);

    let records = sink.records();
    assert_eq!(records[0].level, SinkLevel::Info);
    assert_eq!(records[1].level, SinkLevel::Warning);
    assert!(records.iter().all(|r| r.report_filename().is_none()));
    assert!(report_files(dir.path()).is_empty());
}

#[test]
fn test_missing_directory_still_logs() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    let (logger, sink) = make_logger(&missing);

    logger.critical(ErrorValue::new("Fatal", "out of memory", "src/alloc.rs", 1));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, SinkLevel::Critical);
    assert_eq!(records[0].message, "Fatal: out of memory in src/alloc.rs:1");
    assert!(records[0].report_filename().is_none());
}

#[test]
fn test_default_wiring_writes_log_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new()
        .logging_directory(dir.path().to_path_buf())
        .logging_channel("web")
        .build();
    let logger = from_config(&config).unwrap();

    logger.exception(ErrorValue::new("RouteError", "no route for /x", "src/router.rs", 31));

    assert_eq!(report_files(dir.path()).len(), 1);
    let log_files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.starts_with("web-") && name.ends_with(".log")
        })
        .collect();
    assert_eq!(log_files.len(), 1);

    let content = fs::read_to_string(log_files[0].path()).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(line["level"], "CRITICAL");
    assert_eq!(line["message"], "RouteError: no route for /x in src/router.rs:31");
    assert_eq!(line["context"]["tracy_created"], true);
}

#[test]
fn test_reports_disabled_skips_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new()
        .logging_directory(dir.path().to_path_buf())
        .reports_enabled(false)
        .build();
    let logger = from_config(&config).unwrap();

    logger.exception(ErrorValue::new("E", "m", "f", 1));
    assert!(report_files(dir.path()).is_empty());
}

#[test]
fn test_configured_level_filters_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new()
        .logging_directory(dir.path().to_path_buf())
        .logging_channel("jobs")
        .logging_level("warn")
        .build();
    let logger = from_config(&config).unwrap();

    logger.debug("cache miss");
    logger.info("job started");
    logger.warning("job slow");

    let log_file = fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .find(|e| e.file_name().to_string_lossy().starts_with("jobs-"))
        .expect("log file written");
    let content = fs::read_to_string(log_file.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let line: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(line["level"], "WARNING");
    assert_eq!(line["message"], "job slow");
}
