//! Process-wide logger registration and panic reporting
//!
//! The global logger is set once (first call wins) and is what the panic
//! hook reports to. The hook chains with the previously installed one so
//! default behavior (stderr output) is preserved.

use std::sync::{Arc, OnceLock};

use screenlog_core::domain::event::CONTEXT_AT;
use screenlog_core::domain::{ErrorValue, LogEvent, Severity};

use crate::logger::Logger;

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// Registers `logger` as the process-wide logger.
///
/// Returns `false` if a logger was already registered.
pub fn set_global(logger: Arc<Logger>) -> bool {
    GLOBAL.set(logger).is_ok()
}

/// The process-wide logger, if one was registered.
pub fn global() -> Option<&'static Arc<Logger>> {
    GLOBAL.get()
}

/// Installs a panic hook that logs every panic at `Exception` severity.
///
/// Processors and sinks run inside the hook, where a second panic aborts
/// the process; renderer panics are contained by the report capture, but
/// custom sinks and processors must not panic.
pub fn install_panic_hook(logger: Arc<Logger>) {
    let previous_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info.location();
        let at = location
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let trace = backtrace_frames(&std::backtrace::Backtrace::force_capture().to_string());

        let error = ErrorValue::from_panic(&message, location).with_trace(trace);
        logger.log_event(LogEvent::new(error, Severity::Exception).with_context(CONTEXT_AT, at));

        // Call the previous panic hook
        previous_hook(panic_info);
    }));
}

/// Splits a rendered backtrace into trimmed, non-empty frame lines.
fn backtrace_frames(rendered: &str) -> Vec<String> {
    rendered
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
