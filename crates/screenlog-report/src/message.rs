//! Display messages for error events
//!
//! When an error is logged without a text message, the record's message is
//! synthesized from the error chain: one `"<Kind>: <text> in <file>:<line>"`
//! line per link, outermost first, joined with `"\ncaused by "`.

use screenlog_core::domain::ErrorValue;

/// Separator placed between chain links.
pub const CAUSED_BY: &str = "\ncaused by ";

/// Formats a single chain link.
pub fn format_link(error: &ErrorValue) -> String {
    format!(
        "{}: {} in {}:{}",
        error.label(),
        error.message(),
        error.file(),
        error.line()
    )
}

/// Formats at most `max_depth` links of the chain starting at `error`.
pub fn format_chain(error: &ErrorValue, max_depth: usize) -> String {
    let links: Vec<String> = error.chain().take(max_depth).map(format_link).collect();
    links.join(CAUSED_BY).trim().to_string()
}
