//! Free functions forwarding to the process-wide [`Logger::global`] instance.
//!
//! The default logger starts with no sinks; register at least one before
//! logging or every call is a no-op.
//!
//! ```rust
//! use minilog::log::{global, Sink};
//!
//! global::add_sink("console", Sink::stderr());
//! global::info("listening on port {}", &[&8080]);
//! ```

use std::{fmt::Display, sync::Arc};

use crate::log::{log_error::Result, log_level::LogLevel, logger::Logger, sink::Sink};

pub fn add_sink(name: impl Into<String>, sink: Sink) -> bool {
    Logger::global().add_sink(name, sink)
}

pub fn remove_sink(name: &str) -> Option<Arc<Sink>> {
    Logger::global().remove_sink(name)
}

pub fn remove_last_sink() -> Option<Arc<Sink>> {
    Logger::global().remove_last_sink()
}

/// Drops every sink of the default logger, closing the files they own.
pub fn clear_sinks() {
    Logger::global().clear_sinks();
}

/// # Errors
///
/// [`LogError::SinkNotFound`](crate::log::LogError::SinkNotFound) if no sink has that name.
pub fn get_sink(name: &str) -> Result<Arc<Sink>> {
    Logger::global().get_sink(name)
}

pub fn log(level: LogLevel, template: &str, args: &[&dyn Display]) {
    Logger::global().log(level, template, args);
}

pub fn debug(template: &str, args: &[&dyn Display]) {
    log(LogLevel::Debug, template, args);
}

pub fn info(template: &str, args: &[&dyn Display]) {
    log(LogLevel::Info, template, args);
}

pub fn warn(template: &str, args: &[&dyn Display]) {
    log(LogLevel::Warn, template, args);
}

pub fn error(template: &str, args: &[&dyn Display]) {
    log(LogLevel::Error, template, args);
}

pub fn fatal(template: &str, args: &[&dyn Display]) {
    log(LogLevel::Fatal, template, args);
}

/// Free functions forwarding to the process-wide [`LogBuffer::global`](crate::log::LogBuffer::global).
pub mod history {
    use std::{io, io::Write, path::Path};

    use crate::log::{
        log_buffer::{LogBuffer, LogRecord},
        log_error::Result,
        log_level::{LevelFilter, LogLevel},
        output_options::OutputOptions,
        sink::Stream,
        time_range::TimeRange,
    };

    pub fn push(level: LogLevel, message: impl Into<String>) {
        LogBuffer::global().push(level, message);
    }

    pub fn bind_out_stream(stream: Stream) {
        LogBuffer::global().bind_out_stream(stream);
    }

    /// # Errors
    ///
    /// [`LogError::OpenFile`](crate::log::LogError::OpenFile) if the file cannot be opened.
    pub fn bind_file_stream<P: AsRef<Path>>(path: P) -> Result<()> {
        LogBuffer::global().bind_file_stream(path)
    }

    pub fn unbind_stream() {
        LogBuffer::global().unbind_stream();
    }

    pub fn set_stream_attributes(
        level_filter: LevelFilter,
        time_range: TimeRange,
        options: OutputOptions,
    ) {
        LogBuffer::global().set_stream_attributes(level_filter, time_range, options);
    }

    pub fn reset_stream_attributes() {
        LogBuffer::global().reset_stream_attributes();
    }

    #[must_use]
    pub fn count() -> usize {
        LogBuffer::global().count()
    }

    #[must_use]
    pub fn is_empty() -> bool {
        LogBuffer::global().is_empty()
    }

    #[must_use]
    pub fn front(options: OutputOptions) -> Option<String> {
        LogBuffer::global().front(options)
    }

    #[must_use]
    pub fn back(options: OutputOptions) -> Option<String> {
        LogBuffer::global().back(options)
    }

    pub fn pop_front() {
        LogBuffer::global().pop_front();
    }

    pub fn pop_back() {
        LogBuffer::global().pop_back();
    }

    pub fn clear() {
        LogBuffer::global().clear();
    }

    #[must_use]
    pub fn records() -> Vec<LogRecord> {
        LogBuffer::global().records()
    }

    /// # Errors
    ///
    /// The first I/O error from `out`.
    pub fn out<W: Write + ?Sized>(
        out: &mut W,
        level_filter: LevelFilter,
        time_range: TimeRange,
        options: OutputOptions,
    ) -> io::Result<usize> {
        LogBuffer::global().out(out, level_filter, time_range, options)
    }

    /// # Errors
    ///
    /// [`LogError::OpenFile`](crate::log::LogError::OpenFile) or
    /// [`LogError::Io`](crate::log::LogError::Io).
    pub fn out_to_file<P: AsRef<Path>>(
        path: P,
        level_filter: LevelFilter,
        time_range: TimeRange,
        options: OutputOptions,
    ) -> Result<usize> {
        LogBuffer::global().out_to_file(path, level_filter, time_range, options)
    }
}
