//! Core logging engine types

pub mod buffer;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod number;
pub mod sink;
pub mod string;
pub mod timestamp;
pub mod value;

pub use buffer::{Buffer, WriteGuard};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use sink::Sink;
pub use value::{LogValue, RawJson};
