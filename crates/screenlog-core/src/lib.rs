//! screenlog Core - Domain types and ports
//!
//! This crate contains the pieces every other screenlog crate agrees on:
//! - **Domain types** - `Severity`, `SinkLevel`, `ErrorValue`, `LogEvent`, `LogRecord`
//! - **Port definitions** - Traits for adapters: `IErrorRenderer`, `ILogSink`, `IRecordProcessor`
//! - **Configuration** - YAML-backed `Config` with defaults, validation and a builder
//!
//! # Architecture
//!
//! The domain module holds plain data with no I/O. Ports define the trait
//! interfaces that the report and bridge crates implement.

pub mod config;
pub mod domain;
pub mod ports;
