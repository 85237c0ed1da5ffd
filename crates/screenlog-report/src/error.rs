//! Report error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, writing or managing report files
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report directory is missing or cannot be listed
    #[error("Report directory unavailable: {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An individual report file could not be read or removed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The renderer failed while writing a report
    #[error("Rendering failed: {0}")]
    Render(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::Directory {
            path: PathBuf::from("/var/log/app"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "Report directory unavailable: /var/log/app: not found"
        );

        let err = ReportError::Render(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(err.to_string(), "Rendering failed: disk full");
    }
}
