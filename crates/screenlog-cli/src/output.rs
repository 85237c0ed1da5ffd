//! Command output
//!
//! Every command prints through a [`Printer`], which owns the human and
//! JSON renderings of reports, configuration and validation results. The
//! streams are injectable so commands can be exercised against buffers.

use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use screenlog_core::config::{Config, ValidationError};
use screenlog_report::ReportEntry;
use serde_json::json;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Renders command results to an output and an error stream
pub struct Printer<O: Write, E: Write> {
    format: OutputFormat,
    out: O,
    err: E,
}

impl Printer<Stdout, Stderr> {
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(format, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Printer<O, E> {
    pub fn new(format: OutputFormat, out: O, err: E) -> Self {
        Self { format, out, err }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(self.out, "\u{2713} {}", message),
            OutputFormat::Json => {
                writeln!(self.out, "{}", json!({"success": true, "message": message}))
            }
        }
    }

    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(self.err, "\u{2717} Error: {}", message),
            OutputFormat::Json => {
                writeln!(self.err, "{}", json!({"success": false, "error": message}))
            }
        }
    }

    /// Informational line; JSON output stays silent.
    pub fn note(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(self.out, "  {}", message),
            OutputFormat::Json => Ok(()),
        }
    }

    /// Report table (human) or array of report objects (JSON).
    pub fn reports(&mut self, entries: &[ReportEntry], directory: &Path) -> Result<()> {
        if self.format == OutputFormat::Json {
            let json: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
            return self.json(&serde_json::Value::Array(json));
        }
        if entries.is_empty() {
            self.note(&format!("No reports found in {}", directory.display()))?;
            return Ok(());
        }

        writeln!(self.out, "{:<12} {:<18} {:>10}", "ID", "Date", "Size")?;
        writeln!(self.out, "{}", "-".repeat(42))?;
        for entry in entries {
            writeln!(
                self.out,
                "{:<12} {:<18} {:>10}",
                entry.identifier,
                entry.timestamp,
                format_size(entry.size_bytes),
            )?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Total: {} report(s) in {}", entries.len(), directory.display())?;
        Ok(())
    }

    /// Raw HTML (human) or the report object with its content (JSON).
    pub fn report(&mut self, entry: &ReportEntry, html: &str) -> Result<()> {
        if self.format == OutputFormat::Json {
            let mut json = entry_json(entry);
            json["content"] = serde_json::Value::String(html.to_string());
            return self.json(&json);
        }
        self.out.write_all(html.as_bytes())?;
        Ok(())
    }

    pub fn report_path(&mut self, entry: &ReportEntry) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(&json!({
                "id": entry.identifier,
                "path": entry.path.display().to_string(),
            }));
        }
        writeln!(self.out, "{}", entry.path.display())?;
        Ok(())
    }

    /// Effective configuration as indented YAML (human) or JSON.
    pub fn config(&mut self, config: &Config, path: &Path) -> Result<()> {
        if self.format == OutputFormat::Json {
            let json =
                serde_json::to_value(config).context("Failed to serialize configuration to JSON")?;
            return self.json(&json);
        }
        self.success(&format!("Configuration ({})", path.display()))?;
        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            self.note(line)?;
        }
        Ok(())
    }

    /// Outcome of validating the file at `path`.
    pub fn validation(&mut self, path: &Path, errors: &[ValidationError]) -> Result<()> {
        if self.format == OutputFormat::Json {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return self.json(&json!({
                "valid": errors.is_empty(),
                "config_path": path.display().to_string(),
                "errors": messages,
            }));
        }
        if errors.is_empty() {
            self.success("Configuration is valid")?;
            self.note(&format!("File: {}", path.display()))?;
            return Ok(());
        }
        self.failure(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ))?;
        self.note(&format!("File: {}", path.display()))?;
        for error in errors {
            self.note(&format!("  {} - {}", error.field, error.message))?;
        }
        Ok(())
    }

    /// A configuration file that could not be parsed.
    pub fn unparseable(&mut self, path: &Path, reason: &str) -> Result<()> {
        let message = format!("Failed to parse configuration: {}", reason);
        if self.format == OutputFormat::Json {
            return self.json(&json!({
                "valid": false,
                "config_path": path.display().to_string(),
                "errors": [message],
            }));
        }
        self.failure(&message)?;
        self.note(&format!("File: {}", path.display()))?;
        Ok(())
    }

    fn json(&mut self, value: &serde_json::Value) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

fn entry_json(entry: &ReportEntry) -> serde_json::Value {
    json!({
        "id": entry.identifier,
        "date": entry.timestamp,
        "size_bytes": entry.size_bytes,
        "path": entry.path.display().to_string(),
    })
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
