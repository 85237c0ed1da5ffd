//! Log events and sink records
//!
//! A [`LogEvent`] is what the caller hands to the logger: an application
//! [`Severity`], either a text message or an [`ErrorValue`], and a context
//! map. Processors rewrite events; the logger then turns the final event
//! into a [`LogRecord`] carrying the sink's [`SinkLevel`].

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::error_value::ErrorValue;
use super::severity::{Severity, SinkLevel};

/// Context key holding the call-site location (`file:line`).
pub const CONTEXT_AT: &str = "at";
/// Context key holding the error value of an error event.
pub const CONTEXT_EXCEPTION: &str = "exception";
/// Context key holding the basename of the exception report file.
pub const CONTEXT_REPORT_FILENAME: &str = "tracy_filename";
/// Context key telling whether the report file was created by this event.
pub const CONTEXT_REPORT_CREATED: &str = "tracy_created";

/// Structured context attached to events and records
pub type Context = BTreeMap<String, ContextValue>;

/// A single context value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Error(ErrorValue),
}

impl ContextValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ContextValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            ContextValue::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Int(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Str(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Str(value)
    }
}

impl From<ErrorValue> for ContextValue {
    fn from(value: ErrorValue) -> Self {
        ContextValue::Error(value)
    }
}

/// Payload of a log call: plain text or an error value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogMessage {
    Text(String),
    Error(ErrorValue),
}

impl LogMessage {
    /// Returns the text, or `None` for an error payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LogMessage::Text(s) => Some(s),
            LogMessage::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogMessage::Error(_))
    }
}

impl Default for LogMessage {
    fn default() -> Self {
        LogMessage::Text(String::new())
    }
}

impl From<&str> for LogMessage {
    fn from(value: &str) -> Self {
        LogMessage::Text(value.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(value: String) -> Self {
        LogMessage::Text(value)
    }
}

impl From<ErrorValue> for LogMessage {
    fn from(value: ErrorValue) -> Self {
        LogMessage::Error(value)
    }
}

/// A log call as it travels through the processor chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub message: LogMessage,
    pub severity: Severity,
    pub context: Context,
    pub channel: String,
    pub datetime: DateTime<Local>,
}

impl LogEvent {
    /// Creates an event stamped with the current local time and an empty
    /// context.
    pub fn new(message: impl Into<LogMessage>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            context: Context::new(),
            channel: String::new(),
            datetime: Local::now(),
        }
    }

    /// Sets the channel name.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Inserts a context entry, replacing any previous value under `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// The error value attached under [`CONTEXT_EXCEPTION`], if any.
    pub fn exception(&self) -> Option<&ErrorValue> {
        self.context.get(CONTEXT_EXCEPTION).and_then(ContextValue::as_error)
    }
}

/// A finalized record as handed to sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: SinkLevel,
    pub message: String,
    pub context: Context,
    pub channel: String,
    pub datetime: DateTime<Local>,
}

impl LogRecord {
    /// Report file basename recorded by the exception processor.
    pub fn report_filename(&self) -> Option<&str> {
        self.context.get(CONTEXT_REPORT_FILENAME).and_then(ContextValue::as_str)
    }

    /// Whether this record's event created its report file.
    pub fn report_created(&self) -> Option<bool> {
        self.context.get(CONTEXT_REPORT_CREATED).and_then(ContextValue::as_bool)
    }
}
