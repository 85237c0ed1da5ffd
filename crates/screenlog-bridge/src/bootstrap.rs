//! Default wiring
//!
//! Assembles the standard pipeline from a [`Config`]: a daily rotating
//! JSON-lines sink at `<directory>/<channel>-YYYY-MM-DD.log` and, when
//! reports are enabled, an exception processor writing HTML reports into
//! the same directory.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use screenlog_core::config::Config;
use screenlog_report::{BlueScreenRenderer, ExceptionProcessor, ExceptionReportStore};
use tracing::info;

use crate::global::{install_panic_hook, set_global};
use crate::logger::Logger;
use crate::sinks::RotatingFileSink;

/// Builds a logger from configuration.
///
/// Fails on an invalid configuration or when the log directory cannot be
/// created.
pub fn from_config(config: &Config) -> Result<Logger> {
    let errors = config.validate();
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration: {}", joined.join("; "));
    }

    let logging = &config.logging;
    std::fs::create_dir_all(&logging.directory).with_context(|| {
        format!("Failed to create log directory {}", logging.directory.display())
    })?;

    let mut builder = Logger::builder(&logging.channel)
        .min_level(logging.min_sink_level())
        .push_sink(Arc::new(RotatingFileSink::new(
            &logging.directory,
            &logging.channel,
            "log",
            logging.max_files,
        )));

    if config.reports.enabled {
        let reports = &config.reports;
        let renderer = Arc::new(BlueScreenRenderer::new(reports.max_chain_depth));
        let store = ExceptionReportStore::new(&logging.directory, renderer)
            .with_chunk_size(reports.chunk_size)
            .with_max_chain_depth(reports.max_chain_depth)
            .with_index(reports.index);
        builder = builder.push_processor(Arc::new(ExceptionProcessor::new(Arc::new(store))));
    }

    info!(
        directory = %logging.directory.display(),
        channel = %logging.channel,
        level = %logging.level,
        reports = config.reports.enabled,
        "Logger configured"
    );

    Ok(builder.build())
}

/// Builds a logger from configuration, registers it globally and installs
/// the panic hook.
///
/// Returns the registered logger; if another logger was registered first,
/// that one is returned and no hook is installed.
pub fn init_global(config: &Config) -> Result<Arc<Logger>> {
    let logger = Arc::new(from_config(config)?);
    if set_global(Arc::clone(&logger)) {
        install_panic_hook(Arc::clone(&logger));
        Ok(logger)
    } else {
        crate::global::global()
            .cloned()
            .context("Global logger vanished after registration")
    }
}
