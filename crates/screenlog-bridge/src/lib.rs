//! screenlog Bridge - Logger facade, sinks and wiring
//!
//! Provides:
//! - `SeverityMapper`: Application severity to sink level translation
//! - `Logger`: Call-site facade running processors and fanning out to sinks
//! - `TracingSink` / `RotatingFileSink`: Sink adapters
//! - `bootstrap`: Default wiring from a `Config`
//! - `global`: Process-wide logger registration and panic hook

pub mod bootstrap;
pub mod global;
pub mod logger;
pub mod severity_map;
pub mod sinks;

pub use bootstrap::{from_config, init_global};
pub use global::{global, install_panic_hook, set_global};
pub use logger::{Logger, LoggerBuilder};
pub use severity_map::SeverityMapper;
pub use sinks::{RotatingFileSink, TracingSink};
