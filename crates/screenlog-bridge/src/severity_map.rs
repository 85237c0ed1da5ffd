//! Severity translation
//!
//! Maps the application [`Severity`] onto the sink's [`SinkLevel`]. Both
//! `Exception` and `Critical` land on `Critical`; anything that cannot be
//! expressed as a [`Severity`] falls back to `Error`.

use screenlog_core::domain::{Severity, SinkLevel};

/// Level used for input that does not name a known severity.
pub const FALLBACK_LEVEL: SinkLevel = SinkLevel::Error;

/// Application severity to sink level mapping.
const SEVERITY_MAP: [(Severity, SinkLevel); 6] = [
    (Severity::Debug, SinkLevel::Debug),
    (Severity::Info, SinkLevel::Info),
    (Severity::Warning, SinkLevel::Warning),
    (Severity::Error, SinkLevel::Error),
    (Severity::Exception, SinkLevel::Critical),
    (Severity::Critical, SinkLevel::Critical),
];

/// Translates application severities into sink levels
pub struct SeverityMapper;

impl SeverityMapper {
    /// Maps a severity to its sink level.
    pub fn map(severity: Severity) -> SinkLevel {
        SEVERITY_MAP
            .iter()
            .find(|(sev, _)| *sev == severity)
            .map(|(_, level)| *level)
            .unwrap_or(FALLBACK_LEVEL)
    }

    /// Maps a severity given by name; unknown names yield [`FALLBACK_LEVEL`].
    pub fn map_name(name: &str) -> SinkLevel {
        name.parse::<Severity>()
            .map(Self::map)
            .unwrap_or(FALLBACK_LEVEL)
    }
}
