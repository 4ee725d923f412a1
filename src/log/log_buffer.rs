use std::{
    collections::VecDeque,
    fmt,
    io::{self, Write},
    path::Path,
    sync::OnceLock,
};

use parking_lot::{Mutex, RwLock};

use crate::log::{
    log_error::Result,
    log_level::{LevelFilter, LogLevel},
    log_line,
    log_sink::LogSink,
    output_options::OutputOptions,
    sink::{self, Sink, Stream},
    time_range::TimeRange,
    timestamp::{self, TimestampFormat},
};

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// One captured message. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Unix seconds.
    pub time: i64,
    pub message: String,
}

impl LogRecord {
    /// Renders the record with the given decoration. Never colorized.
    ///
    /// Tags use the logger's vocabulary. `attention` parses to [`LogLevel::Info`]
    /// and `warning` to [`LogLevel::Warn`], so `[Attention]` and `[Warning]`
    /// are never printed.
    #[must_use]
    pub fn render(&self, options: OutputOptions, format: &TimestampFormat) -> String {
        let timestamp = if options.contains(OutputOptions::WITH_TIMESTAMP) {
            format.render(self.time)
        } else {
            String::new()
        };
        log_line::compose(options, false, &timestamp, self.level, &self.message)
    }
}

/// In-memory, double-ended log history with an optional live "tee" stream.
///
/// Records are kept oldest first. Decoration is computed whenever a record is
/// read or exported, from the flags passed at that moment; nothing rendered is
/// cached. When a stream is bound, [`push`](Self::push) also writes the record
/// there immediately if it passes the stream's level filter and time range.
pub struct LogBuffer {
    records: Mutex<VecDeque<LogRecord>>,
    tee: Sink,
    tee_time_range: RwLock<TimeRange>,
    timestamp_format: RwLock<TimestampFormat>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            tee: Sink::unbound(OutputOptions::default(), LevelFilter::ALL),
            tee_time_range: RwLock::new(TimeRange::all()),
            timestamp_format: RwLock::new(TimestampFormat::default()),
        }
    }

    /// The process-wide default buffer, created empty on first access.
    pub fn global() -> &'static LogBuffer {
        GLOBAL_BUFFER.get_or_init(LogBuffer::new)
    }

    /// Tees future pushes to `stream`, releasing any file bound before.
    pub fn bind_out_stream(&self, stream: Stream) {
        self.tee.rebind(stream);
    }

    /// Tees future pushes to `path`, opened for append.
    ///
    /// # Errors
    ///
    /// [`LogError::OpenFile`](crate::log::LogError::OpenFile) if the file
    /// cannot be opened; the previous binding is kept.
    pub fn bind_file_stream<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.tee.rebind_file(path)
    }

    pub fn unbind_stream(&self) {
        self.tee.unbind();
    }

    #[must_use]
    pub fn is_stream_bound(&self) -> bool {
        self.tee.is_bound()
    }

    /// Sets the filter and decoration applied to the tee stream.
    pub fn set_stream_attributes(
        &self,
        level_filter: LevelFilter,
        time_range: TimeRange,
        options: OutputOptions,
    ) {
        self.tee.set_level_filter(level_filter);
        self.tee.set_output_options(options);
        *self.tee_time_range.write() = time_range;
    }

    /// All levels, any time, level tag and timestamp.
    pub fn reset_stream_attributes(&self) {
        self.set_stream_attributes(LevelFilter::ALL, TimeRange::all(), OutputOptions::default());
    }

    #[must_use]
    pub fn timestamp_format(&self) -> TimestampFormat {
        *self.timestamp_format.read()
    }

    pub fn set_timestamp_format(&self, format: TimestampFormat) {
        *self.timestamp_format.write() = format;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// The oldest record, rendered with `options`.
    #[must_use]
    pub fn front(&self, options: OutputOptions) -> Option<String> {
        let format = self.timestamp_format();
        self.records.lock().front().map(|r| r.render(options, &format))
    }

    /// The newest record, rendered with `options`.
    #[must_use]
    pub fn back(&self, options: OutputOptions) -> Option<String> {
        let format = self.timestamp_format();
        self.records.lock().back().map(|r| r.render(options, &format))
    }

    /// Appends a record stamped with the current time and tees it if bound.
    pub fn push(&self, level: LogLevel, message: impl Into<String>) {
        let record = LogRecord {
            level,
            time: timestamp::now(),
            message: message.into(),
        };

        let mut records = self.records.lock();
        if self.tee.accepts(level) && self.tee_time_range.read().contains(record.time) {
            let stamp = self.timestamp_format.read().render(record.time);
            if let Err(error) = self.tee.emit(level, &stamp, &record.message) {
                tracing::warn!(%error, "failed to tee log record");
            }
        }
        records.push_back(record);
    }

    /// Drops the oldest record. No-op when empty.
    pub fn pop_front(&self) {
        self.records.lock().pop_front();
    }

    /// Drops the newest record. No-op when empty.
    pub fn pop_back(&self) {
        self.records.lock().pop_back();
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// A point-in-time copy of every record, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Writes every record passing `level_filter` and `time_range` to `out`,
    /// one line each, oldest first.
    ///
    /// Works on a snapshot: the lock is released before any I/O starts.
    ///
    /// # Errors
    ///
    /// The first I/O error from `out`.
    pub fn out<W: Write + ?Sized>(
        &self,
        out: &mut W,
        level_filter: LevelFilter,
        time_range: TimeRange,
        options: OutputOptions,
    ) -> io::Result<usize> {
        let snapshot = self.records();
        let format = self.timestamp_format();

        let mut written = 0;
        for record in snapshot
            .iter()
            .filter(|r| level_filter.allows(r.level) && time_range.contains(r.time))
        {
            writeln!(out, "{}", record.render(options, &format))?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }

    /// [`out`](Self::out) into `path`, opened for append and closed afterwards.
    ///
    /// # Errors
    ///
    /// [`LogError::OpenFile`](crate::log::LogError::OpenFile) if the file
    /// cannot be opened, [`LogError::Io`](crate::log::LogError::Io) if writing fails.
    pub fn out_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        level_filter: LevelFilter,
        time_range: TimeRange,
        options: OutputOptions,
    ) -> Result<usize> {
        let mut file = sink::open_append(path.as_ref())?;
        Ok(self.out(&mut file, level_filter, time_range, options)?)
    }
}

impl LogSink for LogBuffer {
    fn record(&self, level: LogLevel, msg: &str) {
        self.push(level, msg);
    }
}

impl fmt::Debug for LogBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBuffer")
            .field("count", &self.count())
            .field("tee", &self.tee)
            .field("tee_time_range", &*self.tee_time_range.read())
            .finish()
    }
}
