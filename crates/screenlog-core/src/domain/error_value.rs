//! Chained error values
//!
//! [`ErrorValue`] is the owned, serializable snapshot of an error that the
//! error screen reports on: its kind, message, source location, an optional
//! stack trace and an optional wrapped cause. Values are immutable once
//! built; the `with_*` builders consume `self`.

use std::fmt::{self, Display, Formatter, Write as _};
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of links visited when walking a cause chain.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Severity code carried by system-level errors (warnings, notices and the
/// like raised by the runtime rather than by application code).
///
/// Codes use the classic bit-flag values; anything else is kept as
/// [`SystemErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemErrorCode {
    Fatal,
    Warning,
    Parse,
    Notice,
    CoreError,
    CoreWarning,
    CompileError,
    CompileWarning,
    UserError,
    UserWarning,
    UserNotice,
    Strict,
    RecoverableError,
    Deprecated,
    UserDeprecated,
    Other(u32),
}

impl SystemErrorCode {
    /// Builds a code from its numeric flag value.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Fatal,
            2 => Self::Warning,
            4 => Self::Parse,
            8 => Self::Notice,
            16 => Self::CoreError,
            32 => Self::CoreWarning,
            64 => Self::CompileError,
            128 => Self::CompileWarning,
            256 => Self::UserError,
            512 => Self::UserWarning,
            1024 => Self::UserNotice,
            2048 => Self::Strict,
            4096 => Self::RecoverableError,
            8192 => Self::Deprecated,
            16384 => Self::UserDeprecated,
            other => Self::Other(other),
        }
    }

    /// Numeric flag value.
    pub fn code(&self) -> u32 {
        match self {
            Self::Fatal => 1,
            Self::Warning => 2,
            Self::Parse => 4,
            Self::Notice => 8,
            Self::CoreError => 16,
            Self::CoreWarning => 32,
            Self::CompileError => 64,
            Self::CompileWarning => 128,
            Self::UserError => 256,
            Self::UserWarning => 512,
            Self::UserNotice => 1024,
            Self::Strict => 2048,
            Self::RecoverableError => 4096,
            Self::Deprecated => 8192,
            Self::UserDeprecated => 16384,
            Self::Other(code) => *code,
        }
    }

    /// Human-readable name shown in place of the error kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fatal => "Fatal Error",
            Self::Warning => "Warning",
            Self::Parse => "Parse Error",
            Self::Notice => "Notice",
            Self::CoreError => "Core Error",
            Self::CoreWarning => "Core Warning",
            Self::CompileError => "Compile Error",
            Self::CompileWarning => "Compile Warning",
            Self::UserError => "User Error",
            Self::UserWarning => "User Warning",
            Self::UserNotice => "User Notice",
            Self::Strict => "Strict standards",
            Self::RecoverableError => "Recoverable Error",
            Self::Deprecated => "Deprecated",
            Self::UserDeprecated => "User Deprecated",
            Self::Other(_) => "Unknown error",
        }
    }
}

impl Display for SystemErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An owned snapshot of a (possibly chained) error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorValue {
    kind: String,
    message: String,
    file: String,
    line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system_code: Option<SystemErrorCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    trace: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    /// Creates an error value with no cause, trace or system code.
    pub fn new(
        kind: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            file: file.into(),
            line,
            system_code: None,
            trace: Vec::new(),
            previous: None,
        }
    }

    /// Snapshots a Rust error and its `source()` chain.
    ///
    /// The outermost link takes the short type name of `E` and the given
    /// location. Sources are opaque trait objects, so they are recorded with
    /// the kind `Error` and an unknown location.
    pub fn from_error<E>(err: &E, location: &Location<'_>) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            if causes.len() >= MAX_CHAIN_DEPTH {
                break;
            }
            causes.push(ErrorValue::new("Error", cause.to_string(), "unknown", 0));
            source = cause.source();
        }

        let previous = causes.into_iter().rev().fold(None::<ErrorValue>, |inner, mut link| {
            link.previous = inner.map(Box::new);
            Some(link)
        });

        Self {
            previous: previous.map(Box::new),
            ..ErrorValue::new(
                short_type_name(std::any::type_name::<E>()),
                err.to_string(),
                location.file(),
                location.line(),
            )
        }
    }

    /// Snapshots a panic payload message at the given location.
    pub fn from_panic(message: &str, location: Option<&Location<'_>>) -> Self {
        let (file, line) = location
            .map(|l| (l.file().to_string(), l.line()))
            .unwrap_or_else(|| ("unknown".to_string(), 0));
        ErrorValue::new("panic", message, file, line)
    }

    /// Attaches the wrapped cause.
    pub fn with_previous(mut self, previous: ErrorValue) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Marks the value as a system-level error carrying `code`.
    pub fn with_system_code(mut self, code: SystemErrorCode) -> Self {
        self.system_code = Some(code);
        self
    }

    /// Attaches stack trace frames, outermost first.
    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn system_code(&self) -> Option<SystemErrorCode> {
        self.system_code
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    pub fn previous(&self) -> Option<&ErrorValue> {
        self.previous.as_deref()
    }

    /// Label shown for this link: the system code name if present,
    /// otherwise the kind.
    pub fn label(&self) -> &str {
        match self.system_code {
            Some(code) => code.name(),
            None => &self.kind,
        }
    }

    /// Iterates over this value and its causes, outermost first.
    ///
    /// Callers that render chains should bound the walk with `take()`.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Full textual dump: every link with its location and trace frames,
    /// at most [`MAX_CHAIN_DEPTH`] links deep.
    ///
    /// This is the text report identifiers are derived from, so it must be
    /// deterministic for equal values.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (depth, link) in self.chain().take(MAX_CHAIN_DEPTH).enumerate() {
            if depth > 0 {
                out.push_str("\n\nNext ");
            }
            let _ = write!(
                out,
                "{}: {} in {}:{}",
                link.label(),
                link.message,
                link.file,
                link.line
            );
            if !link.trace.is_empty() {
                out.push_str("\nStack trace:");
                for (i, frame) in link.trace.iter().enumerate() {
                    let _ = write!(out, "\n#{i} {frame}");
                }
            }
        }
        out
    }
}

impl Display for ErrorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.message)
    }
}

/// Iterator over an error chain, see [`ErrorValue::chain`].
pub struct Chain<'a> {
    next: Option<&'a ErrorValue>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a ErrorValue;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous();
        Some(current)
    }
}

/// Strips module paths from a type name, keeping generic arguments intact.
fn short_type_name(full: &str) -> String {
    let (head, generics) = match full.find('<') {
        Some(idx) => full.split_at(idx),
        None => (full, ""),
    };
    let base = head.rsplit("::").next().unwrap_or(head);
    format!("{base}{generics}")
}
