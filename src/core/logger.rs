//! Field logger
//!
//! A `Logger` owns one buffer holding an in-progress JSON object and a
//! boundary splitting it into context fields (inherited, kept across
//! emissions) and pending fields (added since the last fork or emission,
//! discarded after each record). Loggers forked from a common root share
//! only the sink handle; buffers are always deep-copied, so a logger
//! needs no locking of its own.
//!
//! A single `Logger` must not be used from more than one thread. Each
//! thread forks its own instance; the sink is the only shared state.

use super::buffer::{Buffer, WriteGuard};
use super::log_level::LogLevel;
use super::sink::Sink;
use super::string::append_quoted;
use super::value::LogValue;
use std::sync::Arc;
use std::time::SystemTime;

pub struct Logger {
    fields: Buffer,
    /// Byte offset separating context fields from pending fields.
    context_len: usize,
    sink: Arc<Sink>,
}

impl Logger {
    /// Fresh logger with an empty context, writing to `sink`.
    #[must_use]
    pub fn root(sink: Arc<Sink>) -> Self {
        let mut fields = Buffer::new();
        {
            let mut g = WriteGuard::new(&mut fields, 256);
            g.push(b'{');
        }
        Self {
            fields,
            context_len: 1,
            sink,
        }
    }

    /// Add a field to the pending set.
    ///
    /// Keys are not deduplicated; a repeated key produces a repeated key
    /// in the output, left for the consuming JSON parser to resolve
    /// (RFC 8259 only says names SHOULD be unique).
    pub fn with<V: LogValue>(&mut self, key: &str, value: V) -> &mut Self {
        append_quoted(&mut self.fields, key.as_bytes());
        self.fields.append(b":");
        value.append_to(&mut self.fields);
        self.fields.append(b",");
        self
    }

    /// New logger inheriting this logger's context and pending fields as
    /// its context. This logger's pending fields are discarded; the two
    /// buffers never alias afterward.
    #[must_use]
    pub fn fork(&mut self) -> Logger {
        let fields = self.fields.duplicate();
        let child = Logger {
            context_len: fields.len(),
            fields,
            sink: Arc::clone(&self.sink),
        };
        self.fields.shrink(self.fields.len() - self.context_len);
        child
    }

    /// Committed bytes of the in-progress record. Exposed for tests and
    /// diagnostics; content is not yet a closed JSON object.
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.fields.as_bytes()
    }

    pub fn critical<V: LogValue>(&mut self, msg: V) {
        self.with("level", "critical").with("msg", msg);
        self.emit(LogLevel::Critical);
    }

    pub fn fatal<V: LogValue>(&mut self, msg: V) {
        self.with("level", "fatal").with("msg", msg);
        self.emit(LogLevel::Fatal);
    }

    pub fn error<V: LogValue>(&mut self, msg: V) {
        self.with("level", "error").with("msg", msg);
        self.emit(LogLevel::Error);
    }

    pub fn warning<V: LogValue>(&mut self, msg: V) {
        self.with("level", "warning").with("msg", msg);
        self.emit(LogLevel::Warning);
    }

    pub fn info<V: LogValue>(&mut self, msg: V) {
        self.with("level", "info").with("msg", msg);
        self.emit(LogLevel::Info);
    }

    pub fn debug<V: LogValue>(&mut self, msg: V) {
        self.with("level", "debug").with("msg", msg);
        self.emit(LogLevel::Debug);
    }

    /// Append the timestamp, close the object, hand the record to the
    /// sink, then roll the buffer back to the context boundary. The
    /// rollback happens whether or not anything was written.
    fn emit(&mut self, level: LogLevel) {
        self.with("time", SystemTime::now());
        // Trailing comma becomes the closing brace.
        self.fields.shrink(1);
        self.fields.append(b"}\n");
        if let Err(e) = self.sink.write_record(level, self.fields.as_bytes()) {
            eprintln!("[LOGGER ERROR] sink write failed: {}", e);
        }
        self.fields.shrink(self.fields.len() - self.context_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
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

    fn capture() -> (SharedBuf, Logger) {
        let out = SharedBuf::new();
        let sink = Sink::with_output(Box::new(out.clone()));
        (out, Logger::root(sink))
    }

    #[test]
    fn test_record_shape() {
        let (out, mut logger) = capture();
        logger.with("request_id", 7_i64).info("handled");

        let line = out.contents();
        assert!(line.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["request_id"], 7);
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["msg"], "handled");
        assert!(parsed["time"].as_str().unwrap().ends_with("+08:00"));
    }

    #[test]
    fn test_emit_rolls_back_to_context() {
        let (_out, mut logger) = capture();
        let before = logger.buffered().len();
        logger.with("a", 1_i64).info("x");
        assert_eq!(logger.buffered().len(), before);

        // Rollback also happens when the record is filtered out.
        logger.with("b", 2_i64).debug("filtered");
        assert_eq!(logger.buffered().len(), before);
    }

    #[test]
    fn test_fork_inherits_merged_fields() {
        let (out, mut root) = capture();
        let mut child = root.with("thread", 1_i64).fork();

        // Parent pending discarded by the fork.
        root.info("from root");
        let first = out.contents();
        assert!(!first.contains("thread"));

        child.info("from child");
        let all = out.contents();
        let lines: Vec<&str> = all.lines().collect();
        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["thread"], 1);
    }

    #[test]
    fn test_fork_isolation() {
        let (_out, mut root) = capture();
        root.with("service", "api");
        let mut child = root.fork();

        let root_len = root.buffered().len();
        child.with("worker", 3_i64).with("more", true);
        assert_eq!(root.buffered().len(), root_len, "child must not touch parent");

        let child_snapshot = child.buffered().to_vec();
        root.with("extra", 1_i64);
        assert_eq!(child.buffered(), &child_snapshot[..], "parent must not touch child");
    }

    #[test]
    fn test_context_survives_emissions() {
        let (out, mut root) = capture();
        let mut logger = root.with("app", "demo").fork();
        logger.info("one");
        logger.info("two");

        for line in out.contents().lines() {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(parsed["app"], "demo");
        }
    }

    #[test]
    fn test_duplicate_keys_allowed() {
        let (out, mut logger) = capture();
        logger.with("k", 1_i64).with("k", 2_i64).info("dup");
        let line = out.contents();
        assert_eq!(line.matches("\"k\":").count(), 2);
        // Standard parsers keep the last value.
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["k"], 2);
    }

    #[test]
    fn test_severity_filtering() {
        let (out, mut logger) = capture();
        logger.sink.set_level(LogLevel::Warning);

        logger.info("dropped");
        logger.debug("dropped");
        assert!(out.contents().is_empty());

        logger.warning("kept");
        logger.error("kept");
        logger.fatal("kept");
        logger.critical("kept");
        assert_eq!(out.contents().lines().count(), 4);
    }

    #[test]
    fn test_field_order() {
        let (out, mut logger) = capture();
        logger.with("ctx", 1_i64).info("m");
        let line = out.contents();
        let ctx = line.find("\"ctx\"").unwrap();
        let level = line.find("\"level\"").unwrap();
        let msg = line.find("\"msg\"").unwrap();
        let time = line.find("\"time\"").unwrap();
        assert!(ctx < level && level < msg && msg < time);
    }

    #[test]
    fn test_message_value_types() {
        let (out, mut logger) = capture();
        logger.info(42_i64);
        logger.info(2.5_f64);
        logger.info(true);
        logger.info(None::<&str>);

        let lines: Vec<String> = out.contents().lines().map(String::from).collect();
        let msgs: Vec<serde_json::Value> = lines
            .iter()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["msg"].clone())
            .collect();
        assert_eq!(msgs[0], 42);
        assert_eq!(msgs[1], 2.5);
        assert_eq!(msgs[2], true);
        assert!(msgs[3].is_null());
    }
}
