//! Error renderer port
//!
//! Renderers turn an [`ErrorValue`] into a human-readable document (HTML by
//! default). The output sink is always passed in explicitly; a renderer
//! must not write anywhere else.

use std::io::{self, Write};

use crate::domain::ErrorValue;

/// Renders an error value into the given writer
pub trait IErrorRenderer: Send + Sync {
    /// Writes the full rendering of `error` to `out`.
    ///
    /// A partial write followed by an error leaves the caller responsible
    /// for discarding whatever was written.
    fn render(&self, error: &ErrorValue, out: &mut dyn Write) -> io::Result<()>;
}
