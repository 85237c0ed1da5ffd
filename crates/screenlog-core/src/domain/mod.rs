//! Domain entities
//!
//! This module contains the core domain types for screenlog:
//! - Application and sink severity ladders
//! - Chained error values and their system-error codes
//! - Log events, records and context values
//! - Domain-specific error types

pub mod error_value;
pub mod errors;
pub mod event;
pub mod severity;

// Re-export commonly used types
pub use error_value::{ErrorValue, SystemErrorCode};
pub use errors::DomainError;
pub use event::{Context, ContextValue, LogEvent, LogMessage, LogRecord};
pub use severity::{Severity, SinkLevel};
