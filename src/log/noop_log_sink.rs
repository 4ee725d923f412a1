use crate::log::{log_level::LogLevel, log_sink::LogSink};

/// Discards everything.
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn record(&self, _level: LogLevel, _msg: &str) {}
}
