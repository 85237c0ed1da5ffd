//! Content-derived report identifiers
//!
//! Two error values whose dumps are equal once resource handle numbers are
//! blanked out share an identifier, and therefore a report file. Handle
//! numbers differ from run to run for the same logical failure, which is
//! why they are normalized away before hashing.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use screenlog_core::domain::{DomainError, ErrorValue};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const REPORT_ID_LEN: usize = 10;

/// Resource handle spellings whose numeric part is blanked before hashing.
static HANDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Resource id #|fd #|handle #)\d+").expect("handle pattern is valid")
});

/// A 10-character lowercase hex identifier of a report
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportId(String);

impl ReportId {
    /// Computes the identifier of `error` from its normalized dump.
    pub fn for_error(error: &ErrorValue) -> Self {
        Self::for_dump(&error.dump())
    }

    /// Computes the identifier of an already rendered textual dump.
    pub fn for_dump(dump: &str) -> Self {
        let normalized = normalize_handles(dump);
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..REPORT_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReportId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReportId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == REPORT_ID_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(DomainError::InvalidReportId(s.to_string()))
        }
    }
}

/// Replaces every resource handle number with nothing, keeping the prefix.
pub fn normalize_handles(text: &str) -> String {
    HANDLE_PATTERN.replace_all(text, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_shape() {
        let id = ReportId::for_error(&ErrorValue::new("A", "boom", "src/main.rs", 3));
        assert_eq!(id.as_str().len(), REPORT_ID_LEN);
        assert!(id.as_str().parse::<ReportId>().is_ok());
    }

    #[test]
    fn test_identifier_matches_sha256_prefix() {
        let mut hasher = Sha256::new();
        hasher.update(b"plain text");
        let expected = format!("{:x}", hasher.finalize());
        assert_eq!(ReportId::for_dump("plain text").as_str(), &expected[..10]);
    }

    #[test]
    fn test_equal_values_share_identifier() {
        let a = ErrorValue::new("A", "boom", "src/main.rs", 3);
        let b = ErrorValue::new("A", "boom", "src/main.rs", 3);
        assert_eq!(ReportId::for_error(&a), ReportId::for_error(&b));
    }

    #[test]
    fn test_different_values_differ() {
        let a = ErrorValue::new("A", "boom", "src/main.rs", 3);
        let b = ErrorValue::new("A", "boom", "src/main.rs", 4);
        assert_ne!(ReportId::for_error(&a), ReportId::for_error(&b));
    }

    #[test]
    fn test_resource_handles_are_normalized() {
        let a = ErrorValue::new("IoError", "read failed on Resource id #12", "f.rs", 1)
            .with_trace(vec!["read(handle #7)".to_string()]);
        let b = ErrorValue::new("IoError", "read failed on Resource id #981", "f.rs", 1)
            .with_trace(vec!["read(handle #3)".to_string()]);
        assert_eq!(ReportId::for_error(&a), ReportId::for_error(&b));
    }

    #[test]
    fn test_normalize_handles() {
        assert_eq!(
            normalize_handles("Resource id #42 and fd #3, id #9"),
            "Resource id # and fd #, id #9"
        );
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("0123456789".parse::<ReportId>().is_ok());
        assert!("0123456789a".parse::<ReportId>().is_err());
        assert!("ABCDEF0123".parse::<ReportId>().is_err());
        assert!("xyz".parse::<ReportId>().is_err());
    }
}
