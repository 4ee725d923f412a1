use crate::log::log_level::LogLevel;

/// Something that accepts finished log messages.
///
/// Lets a component take "somewhere to log" as `Arc<dyn LogSink>` without
/// caring whether it is a fan-out [`Logger`](crate::log::Logger), a
/// [`LogBuffer`](crate::log::LogBuffer), or nothing at all. `msg` is taken
/// verbatim; no placeholder substitution happens here.
pub trait LogSink: Send + Sync {
    fn record(&self, level: LogLevel, msg: &str);
}
