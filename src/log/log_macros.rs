//! Leveled logging macros for an explicit `Logger` and for the global one.
//!
//! ```rust
//! use minilog::log::{Logger, Sink};
//! use minilog::{logger_error, logger_info};
//!
//! let logger = Logger::new().with_sink("console", Sink::stderr());
//! logger_info!(logger, "connected to {}", "host1");
//! logger_error!(logger, "timeout after {} ms", 500);
//! ```
//!
//! # Feature Flags
//! Specific levels are controlled by cargo features:
//! `log-debug`, `log-info`, `log-warn`, `log-error`, `log-fatal`.
//!
//! If a feature is disabled, the corresponding macros expand to `()`, removing
//! all formatting and allocation overhead at compile time.

// ============================================================================
// 1. GENERIC MACROS
// ============================================================================

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $tmpl:expr $(, $arg:expr)* $(,)?) => {{
        $logger.log($lvl, $tmpl, &[$(&$arg as &dyn ::std::fmt::Display),*]);
    }};
}

#[macro_export]
macro_rules! global_log {
    ($lvl:expr, $tmpl:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log::Logger::global().log($lvl, $tmpl, &[$(&$arg as &dyn ::std::fmt::Display),*]);
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS (Feature Gated)
// ============================================================================

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! logger_debug { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Debug, $($arg)*) } }
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! global_debug { ($($arg:tt)*) => { $crate::global_log!($crate::log::LogLevel::Debug, $($arg)*) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! logger_debug {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! global_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! logger_info { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Info, $($arg)*) } }
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! global_info { ($($arg:tt)*) => { $crate::global_log!($crate::log::LogLevel::Info, $($arg)*) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! logger_info {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! global_info {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! logger_warn { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Warn, $($arg)*) } }
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! global_warn { ($($arg:tt)*) => { $crate::global_log!($crate::log::LogLevel::Warn, $($arg)*) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! logger_warn {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! global_warn {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR ----------------------
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! logger_error { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Error, $($arg)*) } }
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! global_error { ($($arg:tt)*) => { $crate::global_log!($crate::log::LogLevel::Error, $($arg)*) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! logger_error {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! global_error {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- FATAL ----------------------
// Generally always enabled, but consistent structure allows user to disable if really needed.
#[cfg(feature = "log-fatal")]
#[macro_export]
macro_rules! logger_fatal { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Fatal, $($arg)*) } }
#[cfg(feature = "log-fatal")]
#[macro_export]
macro_rules! global_fatal { ($($arg:tt)*) => { $crate::global_log!($crate::log::LogLevel::Fatal, $($arg)*) } }

#[cfg(not(feature = "log-fatal"))]
#[macro_export]
macro_rules! logger_fatal {
    ($($arg:tt)*) => {
        ()
    };
}
#[cfg(not(feature = "log-fatal"))]
#[macro_export]
macro_rules! global_fatal {
    ($($arg:tt)*) => {
        ()
    };
}
