//! Port definitions
//!
//! This module defines the trait seams between the screenlog core and its
//! adapters.
//!
//! ## Ports Overview
//!
//! - [`IErrorRenderer`] - Renders an error value into an explicit writer
//! - [`ILogSink`] - Stores or ships finalized log records
//! - [`IRecordProcessor`] - Rewrites events before they reach the sinks

pub mod processor;
pub mod renderer;
pub mod sink;

pub use processor::IRecordProcessor;
pub use renderer::IErrorRenderer;
pub use sink::ILogSink;
