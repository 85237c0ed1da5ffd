//! Config command - View and validate screenlog configuration
//!
//! Provides the `screenlog config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use screenlog_core::config::Config;
use tracing::info;

use crate::output::{OutputFormat, Printer};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let mut printer = Printer::stdio(format);
        match self {
            ConfigCommand::Show => execute_show(config_path, &mut printer),
            ConfigCommand::Validate => {
                if !execute_validate(config_path, &mut printer)? {
                    std::process::exit(1);
                }
                Ok(())
            }
        }
    }
}

fn execute_show<O: Write, E: Write>(
    config_path: &Path,
    printer: &mut Printer<O, E>,
) -> Result<()> {
    let config = Config::load_or_default(config_path);
    info!(config_path = %config_path.display(), "Showing configuration");
    printer.config(&config, config_path)
}

/// Validates the file at `config_path`; returns whether it is valid.
///
/// A missing file is valid: defaults apply.
fn execute_validate<O: Write, E: Write>(
    config_path: &Path,
    printer: &mut Printer<O, E>,
) -> Result<bool> {
    let config = if config_path.exists() {
        match Config::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                printer.unparseable(config_path, &e.to_string())?;
                return Ok(false);
            }
        }
    } else {
        printer.note(&format!(
            "Configuration file not found at {}; checking defaults",
            config_path.display()
        ))?;
        Config::default()
    };

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = config.validate();
    printer.validation(config_path, &errors)?;
    Ok(errors.is_empty())
}
