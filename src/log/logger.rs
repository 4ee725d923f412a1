use std::{
    fmt::{self, Display},
    sync::{Arc, OnceLock},
};

use parking_lot::{Mutex, RwLock};

use crate::log::{
    formatter::format_message,
    log_error::{LogError, Result},
    log_level::LogLevel,
    log_sink::LogSink,
    output_options::OutputOptions,
    sink::Sink,
    timestamp::TimestampFormat,
};

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Fan-out logger over an insertion-ordered set of named sinks.
///
/// Every call renders the timestamp and the message body once, then walks the
/// sinks in insertion order under a single lock. Each sink applies its own
/// level filter and decoration. Structural changes (add/remove) take the same
/// lock, so no sink is written while the set is being modified.
///
/// A failed write to one sink is reported through `tracing` and does not stop
/// delivery to the others.
///
/// # Example
///
/// ```rust
/// use minilog::log::{LogLevel, Logger, OutputOptions, Sink, Stream};
///
/// let logger = Logger::new().with_sink(
///     "console",
///     Sink::new(Stream::Stderr, OutputOptions::ALL, LogLevel::Warn | LogLevel::Error),
/// );
/// logger.error("timeout after {} ms", &[&500]);
/// ```
pub struct Logger {
    sinks: Mutex<Vec<(String, Arc<Sink>)>>,
    timestamp_format: RwLock<TimestampFormat>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(Vec::new()),
            timestamp_format: RwLock::new(TimestampFormat::default()),
        }
    }

    /// The process-wide default logger, created empty on first access.
    pub fn global() -> &'static Logger {
        GLOBAL_LOGGER.get_or_init(Logger::new)
    }

    /// Builder form of [`add_sink`](Self::add_sink).
    #[must_use]
    pub fn with_sink(self, name: impl Into<String>, sink: Sink) -> Self {
        self.add_sink(name, sink);
        self
    }

    /// Registers `sink` under `name`.
    ///
    /// Returns `false` and drops `sink` if the name is already taken; the
    /// existing sink is left in place.
    pub fn add_sink(&self, name: impl Into<String>, sink: Sink) -> bool {
        self.add_shared_sink(name, Arc::new(sink))
    }

    /// Like [`add_sink`](Self::add_sink) for a sink that is already shared.
    pub fn add_shared_sink(&self, name: impl Into<String>, sink: Arc<Sink>) -> bool {
        let name = name.into();
        let mut sinks = self.sinks.lock();
        if sinks.iter().any(|(n, _)| *n == name) {
            return false;
        }
        sinks.push((name, sink));
        true
    }

    /// Removes the sink named `name`. Unknown names are ignored.
    pub fn remove_sink(&self, name: &str) -> Option<Arc<Sink>> {
        let mut sinks = self.sinks.lock();
        let index = sinks.iter().position(|(n, _)| n == name)?;
        Some(sinks.remove(index).1)
    }

    /// # Errors
    ///
    /// [`LogError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_sink_at(&self, index: usize) -> Result<Arc<Sink>> {
        let mut sinks = self.sinks.lock();
        let len = sinks.len();
        if index >= len {
            return Err(LogError::IndexOutOfRange { index, len });
        }
        Ok(sinks.remove(index).1)
    }

    /// Removes the most recently added sink.
    pub fn remove_last_sink(&self) -> Option<Arc<Sink>> {
        self.sinks.lock().pop().map(|(_, sink)| sink)
    }

    /// Drops every sink, releasing the files they own.
    pub fn clear_sinks(&self) {
        let removed = std::mem::take(&mut *self.sinks.lock());
        drop(removed);
    }

    /// A handle to the sink named `name`, for changing its filter, options or destination.
    ///
    /// # Errors
    ///
    /// [`LogError::SinkNotFound`] if no sink has that name.
    pub fn get_sink(&self, name: &str) -> Result<Arc<Sink>> {
        self.sinks
            .lock()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sink)| Arc::clone(sink))
            .ok_or_else(|| LogError::SinkNotFound(name.to_string()))
    }

    /// # Errors
    ///
    /// [`LogError::IndexOutOfRange`] if `index >= len`.
    pub fn get_sink_at(&self, index: usize) -> Result<Arc<Sink>> {
        let sinks = self.sinks.lock();
        sinks
            .get(index)
            .map(|(_, sink)| Arc::clone(sink))
            .ok_or(LogError::IndexOutOfRange {
                index,
                len: sinks.len(),
            })
    }

    #[must_use]
    pub fn contains_sink(&self, name: &str) -> bool {
        self.sinks.lock().iter().any(|(n, _)| n == name)
    }

    /// Sink names in iteration order.
    #[must_use]
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.lock().iter().map(|(n, _)| n.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    #[must_use]
    pub fn timestamp_format(&self) -> TimestampFormat {
        *self.timestamp_format.read()
    }

    pub fn set_timestamp_format(&self, format: TimestampFormat) {
        *self.timestamp_format.write() = format;
    }

    /// Substitutes `args` into `template` and sends the result to every sink
    /// whose filter accepts `level`.
    pub fn log(&self, level: LogLevel, template: &str, args: &[&dyn Display]) {
        let body = format_message(template, args);
        self.dispatch(level, &body);
    }

    fn dispatch(&self, level: LogLevel, body: &str) {
        let sinks = self.sinks.lock();
        let timestamp = self.timestamp_for(&sinks, level).unwrap_or_default();

        for (name, sink) in sinks.iter() {
            if let Err(error) = sink.emit(level, &timestamp, body) {
                tracing::warn!(sink = %name, %error, "failed to write log line");
            }
        }
    }

    /// Rendered once per call, and only if a sink taking `level` prints it.
    fn timestamp_for(&self, sinks: &[(String, Arc<Sink>)], level: LogLevel) -> Option<String> {
        sinks
            .iter()
            .any(|(_, sink)| {
                sink.accepts(level) && sink.output_options().contains(OutputOptions::WITH_TIMESTAMP)
            })
            .then(|| self.timestamp_format.read().render_now())
    }

    pub fn debug(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Debug, template, args);
    }

    pub fn info(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Info, template, args);
    }

    pub fn warn(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Warn, template, args);
    }

    pub fn error(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Error, template, args);
    }

    pub fn fatal(&self, template: &str, args: &[&dyn Display]) {
        self.log(LogLevel::Fatal, template, args);
    }
}

impl LogSink for Logger {
    fn record(&self, level: LogLevel, msg: &str) {
        self.dispatch(level, msg);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sink_names())
            .field("timestamp_format", &self.timestamp_format())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{log_level::LevelFilter, sink::Stream};
    use std::thread;

    type Buf = Arc<Mutex<Vec<u8>>>;

    fn memory_sink(options: OutputOptions, filter: LevelFilter) -> (Buf, Sink) {
        let buf: Buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Sink::new(Stream::Writer(buf.clone()), options, filter);
        (buf, sink)
    }

    fn lines(buf: &Buf) -> Vec<String> {
        String::from_utf8(buf.lock().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn delivers_only_to_sinks_whose_filter_matches() {
        let (errors, errors_sink) =
            memory_sink(OutputOptions::NONE, LogLevel::Error | LogLevel::Fatal);
        let (all, all_sink) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let logger = Logger::new()
            .with_sink("errors", errors_sink)
            .with_sink("all", all_sink);

        logger.info("hello {}", &[&"world"]);
        logger.error("boom", &[]);

        assert_eq!(lines(&errors), vec!["boom"]);
        assert_eq!(lines(&all), vec!["hello world", "boom"]);
    }

    #[test]
    fn timestamp_precedes_level_precedes_body() {
        let (buf, sink) = memory_sink(
            OutputOptions::WITH_LEVEL | OutputOptions::WITH_TIMESTAMP,
            LevelFilter::ALL,
        );
        let logger = Logger::new().with_sink("mem", sink);
        logger.warn("x={}", &[&1]);

        let line = &lines(&buf)[0];
        let (ts, rest) = line.split_at(19);
        assert!(ts.as_bytes()[4] == b'-' && ts.as_bytes()[13] == b':', "{line}");
        assert_eq!(rest, " [Warn] x=1");
    }

    #[test]
    fn custom_timestamp_format_is_used() {
        let (buf, sink) = memory_sink(OutputOptions::WITH_TIMESTAMP, LevelFilter::ALL);
        let logger = Logger::new().with_sink("mem", sink);
        logger.set_timestamp_format(TimestampFormat::bracketed());
        logger.info("m", &[]);

        let line = &lines(&buf)[0];
        assert!(line.starts_with('['), "{line}");
        assert_eq!(&line[20..], "] m");
    }

    #[test]
    fn duplicate_name_keeps_first_sink() {
        let (first, sink_a) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let (second, sink_b) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let logger = Logger::new();

        assert!(logger.add_sink("x", sink_a));
        assert!(!logger.add_sink("x", sink_b));
        assert_eq!(logger.len(), 1);

        logger.info("only once", &[]);
        assert_eq!(lines(&first), vec!["only once"]);
        assert!(lines(&second).is_empty());
    }

    #[test]
    fn sinks_are_visited_in_insertion_order() {
        let shared: Buf = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new();
        for name in ["c", "a", "b"] {
            let sink = Sink::new(Stream::Writer(shared.clone()), OutputOptions::NONE, LevelFilter::ALL);
            logger.add_sink(name, sink);
        }
        assert_eq!(logger.sink_names(), vec!["c", "a", "b"]);

        logger.info("m", &[]);
        assert_eq!(lines(&shared).len(), 3);
    }

    #[test]
    fn get_sink_allows_mutation_after_registration() {
        let (buf, sink) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let logger = Logger::new().with_sink("mem", sink);

        logger.get_sink("mem").unwrap().set_level_filter(LogLevel::Fatal.into());
        logger.error("filtered", &[]);
        logger.fatal("kept", &[]);
        assert_eq!(lines(&buf), vec!["kept"]);

        assert!(matches!(logger.get_sink("nope"), Err(LogError::SinkNotFound(_))));
    }

    #[test]
    fn index_addressing_and_removal() {
        let logger = Logger::new();
        for name in ["a", "b", "c"] {
            let (_, sink) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
            logger.add_sink(name, sink);
        }

        assert!(logger.get_sink_at(2).is_ok());
        match logger.get_sink_at(3) {
            Err(LogError::IndexOutOfRange { index, len }) => assert_eq!((index, len), (3, 3)),
            other => panic!("expected IndexOutOfRange, got: {:?}", other),
        }

        logger.remove_sink_at(0).unwrap();
        assert_eq!(logger.sink_names(), vec!["b", "c"]);
        assert!(logger.remove_sink_at(5).is_err());

        assert!(logger.remove_last_sink().is_some());
        assert_eq!(logger.sink_names(), vec!["b"]);

        assert!(logger.remove_sink("missing").is_none());
        assert!(logger.remove_sink("b").is_some());
        assert!(logger.is_empty());
        assert!(logger.remove_last_sink().is_none());
    }

    #[test]
    fn removed_sink_receives_nothing() {
        let (buf, sink) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let logger = Logger::new().with_sink("mem", sink);
        logger.info("before", &[]);
        logger.remove_sink("mem");
        logger.info("after", &[]);
        assert_eq!(lines(&buf), vec!["before"]);
    }

    #[test]
    fn unbound_sink_does_not_block_the_others() {
        let (buf, sink) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let logger = Logger::new()
            .with_sink("gone", Sink::unbound(OutputOptions::ALL, LevelFilter::ALL))
            .with_sink("mem", sink);
        logger.info("delivered", &[]);
        assert_eq!(lines(&buf), vec!["delivered"]);
    }

    #[test]
    fn record_takes_message_verbatim() {
        let (buf, sink) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
        let logger = Logger::new().with_sink("mem", sink);
        LogSink::record(&logger, LogLevel::Info, "{} stays");
        assert_eq!(lines(&buf), vec!["{} stays"]);
    }

    #[test]
    fn concurrent_writers_never_tear_lines() {
        let (buf, sink) = memory_sink(OutputOptions::WITH_LEVEL, LevelFilter::ALL);
        let logger = Arc::new(Logger::new().with_sink("mem", sink));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..100 {
                        logger.info("thread {} line {}", &[&t, &i]);
                    }
                })
            })
            .collect();

        // Concurrent structural and attribute changes.
        for _ in 0..50 {
            let (_, extra) = memory_sink(OutputOptions::NONE, LevelFilter::ALL);
            logger.add_sink("extra", extra);
            logger.get_sink("mem").unwrap().set_output_options(OutputOptions::WITH_LEVEL);
            logger.remove_sink("extra");
        }

        for h in handles {
            h.join().unwrap();
        }

        let out = lines(&buf);
        assert_eq!(out.len(), 800);
        assert!(out.iter().all(|l| l.starts_with("[Info] thread ")));
    }

    #[test]
    fn timestamp_is_rendered_only_when_printed() {
        let logger = Logger::new();
        assert_eq!(logger.timestamp_for(&[], LogLevel::Error), None);

        let (_, plain) = memory_sink(OutputOptions::WITH_LEVEL, LevelFilter::ALL);
        let (_, stamped) = memory_sink(OutputOptions::WITH_TIMESTAMP, LogLevel::Error.into());
        let sinks = vec![
            ("plain".to_string(), Arc::new(plain)),
            ("stamped".to_string(), Arc::new(stamped)),
        ];

        assert_eq!(logger.timestamp_for(&sinks, LogLevel::Info), None);
        let stamp = logger.timestamp_for(&sinks, LogLevel::Error).unwrap();
        assert_eq!(stamp.len(), 19);
    }

    #[test]
    fn lines_without_timestamp_carry_no_stamp() {
        let (buf, sink) = memory_sink(OutputOptions::WITH_LEVEL, LevelFilter::ALL);
        let logger = Logger::new().with_sink("mem", sink);
        logger.warn("bare {}", &[&1]);
        assert_eq!(lines(&buf), vec!["[Warn] bare 1"]);
    }
}
