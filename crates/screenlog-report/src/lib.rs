//! screenlog Report - Exception report materialization
//!
//! Provides:
//! - `ExceptionReportStore`: Finds or creates one HTML report file per distinct error
//! - `ReportId`: Content-derived 10-hex-character report identifier
//! - `ReportCapture`: Chunked, scoped writer that renderers write through
//! - `BlueScreenRenderer`: Default HTML renderer
//! - `ExceptionProcessor`: Record processor wiring the store into a logger
//! - `format_chain`: Display message synthesis for error chains

pub mod bluescreen;
pub mod capture;
pub mod error;
pub mod identifier;
pub mod message;
pub mod processor;
pub mod store;

pub use bluescreen::BlueScreenRenderer;
pub use capture::{capture_with, ReportCapture};
pub use error::ReportError;
pub use identifier::ReportId;
pub use message::format_chain;
pub use processor::ExceptionProcessor;
pub use store::{ExceptionReport, ExceptionReportStore, ReportEntry};
