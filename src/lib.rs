//! MiniLog is a small, synchronous, multi-sink leveled logger.
//!
//! It provides two main pieces:
//! - [`log::Logger`]: fans each message out to a set of named sinks (console
//!   streams, files, or any shared writer), each with its own level filter and
//!   decoration options.
//! - [`log::LogBuffer`]: an in-memory log history with export by level and
//!   time range, and an optional live "tee" stream.
//!
//! Both are ordinary constructible types; each also has a lazily created
//! process-wide instance reachable through `global()` and the free functions
//! in [`log::global`].
//!
//! ```rust
//! use minilog::log::{LogLevel, Logger, OutputOptions, Sink, Stream};
//!
//! let logger = Logger::new()
//!     .with_sink(
//!         "console",
//!         Sink::new(
//!             Stream::Stderr,
//!             OutputOptions::ALL,
//!             LogLevel::Warn | LogLevel::Error | LogLevel::Fatal,
//!         ),
//!     );
//! logger.info("connected to {}", &[&"host1"]);
//! logger.error("timeout after {} ms", &[&500]);
//! ```

/// Builds loggers from INI-style configuration files.
pub mod config;
/// Logger, sinks, formatting and the in-memory log history.
pub mod log;
