//! Report command - Manage exception report files
//!
//! Provides the `screenlog report` CLI command with subcommands:
//! - `list`: Show all report files in the log directory
//! - `view <id>`: Print a report's HTML
//! - `delete`: Remove reports from the log directory

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use screenlog_core::config::Config;
use screenlog_report::{BlueScreenRenderer, ExceptionReportStore};
use tracing::debug;

use crate::output::{OutputFormat, Printer};

/// Report management subcommands
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// List all exception reports
    List,
    /// Print a report's HTML
    View {
        /// Report identifier or identifier prefix
        id: String,
        /// Print only the report's path
        #[arg(long)]
        path: bool,
    },
    /// Delete reports from the log directory
    Delete {
        /// Specific report identifier to delete
        id: Option<String>,
        /// Delete all reports
        #[arg(long)]
        all: bool,
    },
}

impl ReportCommand {
    pub fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let config = Config::load_or_default(config_path);
        debug!(directory = %config.logging.directory.display(), "Opening report directory");

        // Read-only management needs neither the index nor real rendering settings.
        let store = ExceptionReportStore::new(
            &config.logging.directory,
            Arc::new(BlueScreenRenderer::default()),
        )
        .with_index(false);

        self.run(&store, &mut Printer::stdio(format))
    }

    fn run<O: Write, E: Write>(
        &self,
        store: &ExceptionReportStore,
        printer: &mut Printer<O, E>,
    ) -> Result<()> {
        match self {
            ReportCommand::List => {
                let entries = store.list().context("Failed to list reports")?;
                printer.reports(&entries, store.directory())?;
            }

            ReportCommand::View { id, path } => {
                let Some(entry) = store.find(id).context("Failed to look up report")? else {
                    printer.failure(&format!("Report '{}' not found", id))?;
                    return Ok(());
                };
                if *path {
                    printer.report_path(&entry)?;
                } else {
                    let html = store
                        .read(&entry.identifier)
                        .context("Failed to read report")?
                        .unwrap_or_default();
                    printer.report(&entry, &html)?;
                }
            }

            ReportCommand::Delete { id, all } => {
                if *all {
                    let count = store.delete_all().context("Failed to delete reports")?;
                    printer.success(&format!("Deleted {} report(s)", count))?;
                } else if let Some(report_id) = id {
                    if store.delete(report_id).context("Failed to delete report")? {
                        printer.success(&format!("Deleted report '{}'", report_id))?;
                    } else {
                        printer.failure(&format!("Report '{}' not found", report_id))?;
                    }
                } else {
                    printer.failure("Specify a report ID or use --all")?;
                }
            }
        }

        Ok(())
    }
}
