//! # fastlog
//!
//! A high-performance structured logging engine emitting single-line
//! JSON records.
//!
//! ## Features
//!
//! - **Fast Formatting**: hand-rolled integer, float, string-escape, and
//!   timestamp formatters writing into a reserve/commit byte buffer
//! - **Field Inheritance**: fork a logger to carry context fields into
//!   worker threads; pending fields are discarded after every record
//! - **Thread Safe**: one mutex around the shared sink, nothing else
//!   shared; records are written and flushed atomically, never
//!   interleaved
//! - **Static Dispatch**: loggable types form a closed trait-impl set,
//!   so an unsupported value type fails at compile time
//!
//! ## Example
//!
//! ```
//! use fastlog::{Logger, Sink};
//!
//! let sink = Sink::stderr();
//! let mut logger = Logger::root(sink);
//! logger.with("request_id", 42_i64).info("request handled");
//! ```

pub mod core;

pub mod prelude {
    pub use crate::core::{
        Buffer, LogLevel, LogValue, Logger, LoggerError, RawJson, Result, Sink, WriteGuard,
    };
}

pub use core::{Buffer, LogLevel, LogValue, Logger, LoggerError, RawJson, Result, Sink, WriteGuard};
