pub mod formatter;
pub mod global;
pub mod log_buffer;
pub mod log_error;
pub mod log_level;
pub mod log_line;
pub mod log_macros;
pub mod log_sink;
pub mod logger;
pub mod noop_log_sink;
pub mod output_options;
pub mod sink;
pub mod stopwatch;
pub mod time_range;
pub mod timestamp;

pub use formatter::format_message;
pub use log_buffer::{LogBuffer, LogRecord};
pub use log_error::{LogError, Result};
pub use log_level::{LevelFilter, LogLevel};
pub use log_sink::LogSink;
pub use logger::Logger;
pub use noop_log_sink::NoopLogSink;
pub use output_options::OutputOptions;
pub use sink::{SharedWriter, Sink, Stream};
pub use stopwatch::StopWatch;
pub use time_range::TimeRange;
pub use timestamp::TimestampFormat;
