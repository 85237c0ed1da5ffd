//! Severity ladders
//!
//! Two enumerations meet in screenlog: the application-level [`Severity`]
//! used by callers of the error screen, and the [`SinkLevel`] understood by
//! the downstream logging sink. Translation between them lives in the bridge
//! crate.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Application-level severity of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Diagnostic noise
    Debug,
    /// Informational message
    Info,
    /// Something looks wrong but execution continues
    Warning,
    /// A handled error
    Error,
    /// An uncaught error value
    Exception,
    /// The application cannot continue
    Critical,
}

impl Severity {
    /// Every severity, in ascending order
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Exception,
        Severity::Critical,
    ];

    /// Lowercase name, as used in configuration and parsing
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Exception => "exception",
            Severity::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownSeverity(s.to_string()))
    }
}

/// Severity ladder of the downstream sink
///
/// Ordinals follow the widely used syslog-derived scale (100 = debug,
/// 600 = emergency), so records stay comparable with other tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SinkLevel {
    Debug = 100,
    Info = 200,
    Notice = 250,
    Warning = 300,
    Error = 400,
    Critical = 500,
    Alert = 550,
    Emergency = 600,
}

impl SinkLevel {
    /// Every sink level, in ascending order
    pub const ALL: [SinkLevel; 8] = [
        SinkLevel::Debug,
        SinkLevel::Info,
        SinkLevel::Notice,
        SinkLevel::Warning,
        SinkLevel::Error,
        SinkLevel::Critical,
        SinkLevel::Alert,
        SinkLevel::Emergency,
    ];

    /// Numeric ordinal of the level
    pub const fn ordinal(self) -> u16 {
        self as u16
    }

    /// Uppercase name of the level
    pub fn name(&self) -> &'static str {
        match self {
            SinkLevel::Debug => "DEBUG",
            SinkLevel::Info => "INFO",
            SinkLevel::Notice => "NOTICE",
            SinkLevel::Warning => "WARNING",
            SinkLevel::Error => "ERROR",
            SinkLevel::Critical => "CRITICAL",
            SinkLevel::Alert => "ALERT",
            SinkLevel::Emergency => "EMERGENCY",
        }
    }
}

impl Display for SinkLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for SinkLevel {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, DomainError> {
        SinkLevel::ALL
            .into_iter()
            .find(|level| level.ordinal() == value)
            .ok_or_else(|| DomainError::UnknownSinkLevel(value.to_string()))
    }
}

impl FromStr for SinkLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        SinkLevel::ALL
            .into_iter()
            .find(|level| level.name() == upper)
            .ok_or_else(|| DomainError::UnknownSinkLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" critical ".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_display_round_trips_names() {
        for sev in Severity::ALL {
            assert_eq!(sev.to_string().parse::<Severity>().unwrap(), sev);
        }
    }

    #[test]
    fn test_sink_level_ordinals() {
        assert_eq!(SinkLevel::Debug.ordinal(), 100);
        assert_eq!(SinkLevel::Error.ordinal(), 400);
        assert_eq!(SinkLevel::Critical.ordinal(), 500);
        assert!(SinkLevel::Warning < SinkLevel::Error);
    }

    #[test]
    fn test_sink_level_try_from_ordinal() {
        assert_eq!(SinkLevel::try_from(250).unwrap(), SinkLevel::Notice);
        assert_eq!(
            SinkLevel::try_from(123),
            Err(DomainError::UnknownSinkLevel("123".to_string()))
        );
    }

    #[test]
    fn test_sink_level_serializes_uppercase() {
        let json = serde_json::to_string(&SinkLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }
}
