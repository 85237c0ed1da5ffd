//! Daily rotating JSON-lines file sink
//!
//! Writes each record as one JSON object per line to
//! `<directory>/<stem>-YYYY-MM-DD.<ext>`, switching files when the record
//! date changes and pruning all but the newest `max_files` files.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context as _};
use chrono::NaiveDate;
use screenlog_core::domain::LogRecord;
use screenlog_core::ports::ILogSink;
use tracing::warn;

struct OpenLog {
    date: NaiveDate,
    file: File,
}

/// JSON-lines sink with one file per day
pub struct RotatingFileSink {
    directory: PathBuf,
    stem: String,
    extension: String,
    max_files: u32,
    current: Mutex<Option<OpenLog>>,
}

impl RotatingFileSink {
    /// Creates a sink writing `<stem>-<date>.<extension>` files in
    /// `directory`. `max_files == 0` keeps every file.
    pub fn new(
        directory: impl Into<PathBuf>,
        stem: impl Into<String>,
        extension: impl Into<String>,
        max_files: u32,
    ) -> Self {
        Self {
            directory: directory.into(),
            stem: stem.into(),
            extension: extension.into(),
            max_files,
            current: Mutex::new(None),
        }
    }

    /// Path of the file holding records dated `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(format!(
            "{}-{}.{}",
            self.stem,
            date.format("%Y-%m-%d"),
            self.extension
        ))
    }

    fn open(&self, date: NaiveDate) -> anyhow::Result<File> {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!("Failed to create log directory {}", self.directory.display())
        })?;
        let path = self.path_for(date);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))
    }

    /// Removes the oldest rotated files beyond `max_files`.
    fn prune(&self) {
        if self.max_files == 0 {
            return;
        }
        let mut rotated = match self.rotated_files() {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, "Failed to list rotated log files");
                return;
            }
        };
        // Date-stamped names sort chronologically.
        rotated.sort();
        let excess = rotated.len().saturating_sub(self.max_files as usize);
        for path in rotated.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&path) {
                warn!(error = %e, path = %path.display(), "Failed to remove rotated log file");
            }
        }
    }

    fn rotated_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let prefix = format!("{}-", self.stem);
        let suffix = format!(".{}", self.extension);
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.directory)?.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(date) = name
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_suffix(suffix.as_str()))
            else {
                continue;
            };
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ILogSink for RotatingFileSink {
    fn handle(&self, record: &LogRecord) -> anyhow::Result<()> {
        let date = record.datetime.date_naive();
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut current = self
            .current
            .lock()
            .map_err(|_| anyhow!("log file lock poisoned"))?;

        let needs_open = !matches!(current.as_ref(), Some(open) if open.date == date);
        if needs_open {
            let file = self.open(date)?;
            *current = Some(OpenLog { date, file });
            self.prune();
        }

        let open = current
            .as_mut()
            .ok_or_else(|| anyhow!("log file not open"))?;
        open.file
            .write_all(line.as_bytes())
            .context("Failed to append log record")?;
        Ok(())
    }
}
