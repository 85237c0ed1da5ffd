//! Exception report storage
//!
//! Materializes one HTML report per distinct error inside a log directory:
//! `exception--YYYY-MM-DD--HH-MM--<id>.html`. Reports are deduplicated by
//! their content-derived [`ReportId`]; the first writer creates the file
//! with an exclusive create and every later occurrence reuses it.
//!
//! Concurrency relies solely on the filesystem: the scan-then-create
//! sequence is not atomic, but `create_new` guarantees at most one writer
//! produces a given file. Losers skip rendering.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use dashmap::DashMap;
use screenlog_core::domain::event::{
    CONTEXT_EXCEPTION, CONTEXT_REPORT_CREATED, CONTEXT_REPORT_FILENAME,
};
use screenlog_core::domain::{ErrorValue, LogEvent, LogMessage};
use screenlog_core::ports::IErrorRenderer;
use tracing::{debug, warn};

use crate::capture::capture_with;
use crate::error::ReportError;
use crate::identifier::ReportId;
use crate::message::format_chain;

const FILE_PREFIX: &str = "exception--";
const FILE_SUFFIX: &str = ".html";
const DEFAULT_CHUNK_SIZE: usize = 4096;
const DEFAULT_MAX_CHAIN_DEPTH: usize = 64;
const DEFAULT_INDEX_CAPACITY: usize = 1024;

/// Outcome of materializing a report for one error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    pub identifier: ReportId,
    pub directory: PathBuf,
    pub filename: String,
    /// True only for the call that created and rendered the file.
    pub created_now: bool,
}

impl ExceptionReport {
    /// Full path of the report file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Entry in a report directory listing
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub identifier: String,
    /// `YYYY-MM-DD--HH-MM` part of the filename.
    pub timestamp: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Finds or creates exception report files in a directory.
pub struct ExceptionReportStore {
    directory: PathBuf,
    renderer: Arc<dyn IErrorRenderer>,
    chunk_size: usize,
    max_chain_depth: usize,
    index: Option<DashMap<ReportId, String>>,
    index_capacity: usize,
    clock: fn() -> DateTime<Local>,
}

impl ExceptionReportStore {
    /// Creates a store writing into `directory` with the given renderer.
    ///
    /// The directory is not created; a missing directory surfaces as
    /// [`ReportError::Directory`] from the lookup step.
    pub fn new(directory: impl Into<PathBuf>, renderer: Arc<dyn IErrorRenderer>) -> Self {
        Self {
            directory: directory.into(),
            renderer,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            index: Some(DashMap::new()),
            index_capacity: DEFAULT_INDEX_CAPACITY,
            clock: Local::now,
        }
    }

    /// Sets the capture chunk size in bytes.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sets how many chain links synthesized messages include.
    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth.max(1);
        self
    }

    /// Enables or disables the in-memory identifier index.
    pub fn with_index(mut self, enabled: bool) -> Self {
        self.index = enabled.then(DashMap::new);
        self
    }

    /// Caps the number of remembered identifiers (minimum 1).
    ///
    /// A full index is cleared before the next insertion; lookups then fall
    /// back to the directory scan until it refills.
    pub fn with_index_capacity(mut self, capacity: usize) -> Self {
        self.index_capacity = capacity.max(1);
        self
    }

    /// Replaces the clock used to timestamp new report filenames.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the report directory path.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    // ========================================================================
    // Event processing
    // ========================================================================

    /// Attaches a report to an error event.
    ///
    /// Events whose message is not an error value are returned unchanged.
    /// Otherwise the error moves to the `exception` context entry, its report
    /// is found or created, `tracy_filename`/`tracy_created` are recorded and
    /// the message is synthesized from the error chain. Report failures are
    /// logged and never propagated.
    pub fn record_if_error(&self, mut event: LogEvent) -> LogEvent {
        let error = match std::mem::take(&mut event.message) {
            LogMessage::Error(error) => error,
            text => {
                event.message = text;
                return event;
            }
        };

        match self.materialize(&error) {
            Ok(report) => {
                event
                    .context
                    .insert(CONTEXT_REPORT_FILENAME.into(), report.filename.into());
                event
                    .context
                    .insert(CONTEXT_REPORT_CREATED.into(), report.created_now.into());
            }
            Err(e) => {
                warn!(error = %e, "Exception report not written");
            }
        }

        event.message = LogMessage::Text(format_chain(&error, self.max_chain_depth));
        event.context.insert(CONTEXT_EXCEPTION.into(), error.into());
        event
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Finds or creates the report file for `error`.
    pub fn materialize(&self, error: &ErrorValue) -> Result<ExceptionReport, ReportError> {
        let identifier = ReportId::for_error(error);

        if let Some(filename) = self.lookup(&identifier)? {
            debug!(report = %filename, "Reusing existing exception report");
            return Ok(self.report(identifier, filename, false));
        }

        let filename = report_filename(&(self.clock)(), &identifier);
        let path = self.directory.join(&filename);

        let created_now = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => self.write_report(error, file, &path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(report = %filename, "Exception report created concurrently");
                self.remember(&identifier, &filename);
                false
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Could not create exception report");
                false
            }
        };

        if created_now {
            self.remember(&identifier, &filename);
        }

        Ok(self.report(identifier, filename, created_now))
    }

    /// Scans the directory for a file whose name contains `identifier`.
    ///
    /// Non-recursive. Unreadable entries are skipped; an unreadable
    /// directory is an error.
    pub fn find_existing(&self, identifier: &ReportId) -> Result<Option<String>, ReportError> {
        let entries = fs::read_dir(&self.directory).map_err(|source| ReportError::Directory {
            path: self.directory.clone(),
            source,
        })?;

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.contains(identifier.as_str()) {
                return Ok(Some(name.into_owned()));
            }
        }
        Ok(None)
    }

    fn lookup(&self, identifier: &ReportId) -> Result<Option<String>, ReportError> {
        if let Some(index) = &self.index {
            let cached = index.get(identifier).map(|entry| entry.value().clone());
            if let Some(filename) = cached {
                if self.directory.join(&filename).exists() {
                    return Ok(Some(filename));
                }
                index.remove(identifier);
            }
        }

        let found = self.find_existing(identifier)?;
        if let Some(filename) = &found {
            self.remember(identifier, filename);
        }
        Ok(found)
    }

    fn remember(&self, identifier: &ReportId, filename: &str) {
        if let Some(index) = &self.index {
            if index.len() >= self.index_capacity && !index.contains_key(identifier) {
                debug!(entries = index.len(), "Exception report index full; clearing");
                index.clear();
            }
            index.insert(identifier.clone(), filename.to_string());
        }
    }

    /// Renders into a freshly created file; removes it if rendering fails
    /// or panics.
    fn write_report(&self, error: &ErrorValue, file: File, path: &Path) -> bool {
        let rendered = capture_with(file, self.chunk_size, |out| self.renderer.render(error, out));
        match rendered {
            Ok(_file) => {
                debug!(path = %path.display(), "Exception report written");
                true
            }
            Err(e) => {
                warn!(
                    error = %ReportError::Render(e),
                    path = %path.display(),
                    "Discarding partial exception report"
                );
                if let Err(e) = fs::remove_file(path) {
                    warn!(error = %e, path = %path.display(), "Failed to remove partial report");
                }
                false
            }
        }
    }

    fn report(&self, identifier: ReportId, filename: String, created_now: bool) -> ExceptionReport {
        ExceptionReport {
            identifier,
            directory: self.directory.clone(),
            filename,
            created_now,
        }
    }

    // ========================================================================
    // Management
    // ========================================================================

    /// List all report files, newest first.
    ///
    /// A missing directory yields an empty list.
    pub fn list(&self) -> Result<Vec<ReportEntry>, ReportError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.directory).map_err(|source| ReportError::Directory {
            path: self.directory.clone(),
            source,
        })?;

        let mut reports = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some((timestamp, identifier)) = parse_report_filename(&name) else {
                continue;
            };
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            reports.push(ReportEntry {
                identifier: identifier.to_string(),
                timestamp: timestamp.to_string(),
                size_bytes: metadata.len(),
                path: entry.path(),
            });
        }

        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(reports)
    }

    /// Find a report by identifier or identifier prefix.
    pub fn find(&self, id: &str) -> Result<Option<ReportEntry>, ReportError> {
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self
            .list()?
            .into_iter()
            .find(|entry| entry.identifier.starts_with(id)))
    }

    /// Read the HTML content of a report.
    pub fn read(&self, id: &str) -> Result<Option<String>, ReportError> {
        let Some(entry) = self.find(id)? else {
            return Ok(None);
        };
        let content = fs::read_to_string(&entry.path).map_err(|source| ReportError::Io {
            path: entry.path.clone(),
            source,
        })?;
        Ok(Some(content))
    }

    /// Delete a report by identifier or identifier prefix.
    pub fn delete(&self, id: &str) -> Result<bool, ReportError> {
        let Some(entry) = self.find(id)? else {
            return Ok(false);
        };
        fs::remove_file(&entry.path).map_err(|source| ReportError::Io {
            path: entry.path.clone(),
            source,
        })?;
        if let Some(index) = &self.index {
            index.retain(|_, filename| !filename.contains(&entry.identifier));
        }
        Ok(true)
    }

    /// Delete all reports; returns how many were removed.
    pub fn delete_all(&self) -> Result<u32, ReportError> {
        let mut count = 0;
        for entry in self.list()? {
            if fs::remove_file(&entry.path).is_ok() {
                count += 1;
            }
        }
        if let Some(index) = &self.index {
            index.clear();
        }
        Ok(count)
    }
}

/// Builds `exception--YYYY-MM-DD--HH-MM--<id>.html` for the given time.
pub fn report_filename(now: &DateTime<Local>, identifier: &ReportId) -> String {
    format!(
        "{FILE_PREFIX}{}--{identifier}{FILE_SUFFIX}",
        now.format("%Y-%m-%d--%H-%M")
    )
}

/// Splits a report filename into its (timestamp, identifier) parts.
fn parse_report_filename(name: &str) -> Option<(&str, &str)> {
    let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    let (timestamp, identifier) = stem.rsplit_once("--")?;
    if timestamp.is_empty() || identifier.is_empty() {
        return None;
    }
    Some((timestamp, identifier))
}
