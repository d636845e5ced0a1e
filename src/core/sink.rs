//! Shared output sink
//!
//! One mutex-protected output target plus a severity threshold, shared
//! by a logger and every logger forked from it. The sink is an explicit,
//! reference-counted handle injected at logger construction rather than
//! process-wide global state. It is consulted only at emission time; the
//! write and flush of a record happen entirely under the lock, so lines
//! from concurrent loggers never interleave.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

struct SinkInner {
    stream: Option<Box<dyn Write + Send>>,
    threshold: LogLevel,
}

/// Thread-safe sink configuration handle.
pub struct Sink {
    inner: Mutex<SinkInner>,
}

impl Sink {
    /// Sink writing to stderr at the default `Info` threshold.
    #[must_use]
    pub fn stderr() -> Arc<Self> {
        Self::with_output(Box::new(std::io::stderr()))
    }

    /// Sink writing to the given stream at the default `Info` threshold.
    #[must_use]
    pub fn with_output(stream: Box<dyn Write + Send>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SinkInner {
                stream: Some(stream),
                threshold: LogLevel::Info,
            }),
        })
    }

    /// Disabled sink; every record is silently dropped until an output
    /// is set.
    #[must_use]
    pub fn disabled() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SinkInner {
                stream: None,
                threshold: LogLevel::Info,
            }),
        })
    }

    /// Replace the output stream. `None` turns output off.
    pub fn set_output(&self, stream: Option<Box<dyn Write + Send>>) {
        self.inner.lock().stream = stream;
    }

    /// Set the least-severe level still written.
    pub fn set_level(&self, level: LogLevel) {
        self.inner.lock().threshold = level;
    }

    /// Current severity threshold.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.inner.lock().threshold
    }

    /// Write one fully formatted record if `level` passes the threshold
    /// and an output is configured. Write and flush are serialized under
    /// the lock; a filtered or outputless record is not an error.
    pub(crate) fn write_record(&self, level: LogLevel, record: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        if level > inner.threshold {
            return Ok(());
        }
        if let Some(stream) = inner.stream.as_mut() {
            stream
                .write_all(record)
                .and_then(|()| stream.flush())
                .map_err(|e| LoggerError::io_operation("writing log record", e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc as StdArc, Mutex as StdMutex};

    /// Test writer sharing its bytes with the asserting side.
    #[derive(Clone)]
    struct SharedBuf(StdArc<StdMutex<Vec<u8>>>);

    impl SharedBuf {
        fn new() -> Self {
            Self(StdArc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_threshold_filtering() {
        let out = SharedBuf::new();
        let sink = Sink::with_output(Box::new(out.clone()));
        sink.set_level(LogLevel::Warning);

        sink.write_record(LogLevel::Debug, b"debug\n").unwrap();
        sink.write_record(LogLevel::Info, b"info\n").unwrap();
        assert!(out.contents().is_empty());

        sink.write_record(LogLevel::Warning, b"warning\n").unwrap();
        sink.write_record(LogLevel::Critical, b"critical\n").unwrap();
        assert_eq!(out.contents(), b"warning\ncritical\n");
    }

    #[test]
    fn test_disabled_sink_drops_records() {
        let sink = Sink::disabled();
        sink.write_record(LogLevel::Critical, b"lost\n").unwrap();

        let out = SharedBuf::new();
        sink.set_output(Some(Box::new(out.clone())));
        sink.write_record(LogLevel::Info, b"kept\n").unwrap();
        assert_eq!(out.contents(), b"kept\n");

        sink.set_output(None);
        sink.write_record(LogLevel::Info, b"lost again\n").unwrap();
        assert_eq!(out.contents(), b"kept\n");
    }

    #[test]
    fn test_default_threshold_is_info() {
        let sink = Sink::disabled();
        assert_eq!(sink.level(), LogLevel::Info);
    }
}
