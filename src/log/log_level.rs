use std::{fmt, ops::BitOr, str::FromStr};

use crate::log::log_error::LogError;

/// Severity of a log message.
///
/// Each level is a distinct bit so that a [`LevelFilter`] can subscribe to an
/// arbitrary subset of levels rather than a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Fine-grained diagnostics. Named `Info` in the history store's vocabulary.
    Debug = 0x01,
    /// Progress of the application. Named `Attention` in the history store's vocabulary.
    Info = 0x02,
    /// Potentially harmful situations.
    Warn = 0x04,
    /// Failures the application can survive.
    Error = 0x08,
    /// Failures the application cannot survive.
    Fatal = 0x10,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Maps a single level bit back to its level. Combined or unknown bits yield `None`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x01 => Some(LogLevel::Debug),
            0x02 => Some(LogLevel::Info),
            0x04 => Some(LogLevel::Warn),
            0x08 => Some(LogLevel::Error),
            0x10 => Some(LogLevel::Fatal),
            _ => None,
        }
    }

    /// The bracketed tag printed in front of a message, e.g. `[Error]`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "[Debug]",
            LogLevel::Info => "[Info]",
            LogLevel::Warn => "[Warn]",
            LogLevel::Error => "[Error]",
            LogLevel::Fatal => "[Fatal]",
        }
    }

    /// ANSI SGR color code used when a console sink colorizes the tag.
    #[must_use]
    pub(crate) const fn color_code(self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[34m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }
}

/// Tag for a raw level value; empty for anything that is not exactly one level bit.
#[must_use]
pub fn tag_for_bits(bits: u8) -> &'static str {
    LogLevel::from_bits(bits).map_or("", LogLevel::tag)
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" | "attention" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LogError::UnknownLevel(s.trim().to_string())),
        }
    }
}

/// A set of levels a sink accepts.
///
/// A message passes iff `filter & level != 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelFilter(u8);

impl LevelFilter {
    pub const NONE: LevelFilter = LevelFilter(0x00);
    pub const ALL: LevelFilter = LevelFilter(0xFF);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn allows(self, level: LogLevel) -> bool {
        self.0 & level.bits() != 0
    }

    #[must_use]
    pub const fn with(self, level: LogLevel) -> Self {
        Self(self.0 | level.bits())
    }

    #[must_use]
    pub const fn without(self, level: LogLevel) -> Self {
        Self(self.0 & !level.bits())
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::ALL
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        Self(level.bits())
    }
}

impl BitOr for LogLevel {
    type Output = LevelFilter;

    fn bitor(self, rhs: LogLevel) -> LevelFilter {
        LevelFilter(self.bits() | rhs.bits())
    }
}

impl BitOr<LogLevel> for LevelFilter {
    type Output = LevelFilter;

    fn bitor(self, rhs: LogLevel) -> LevelFilter {
        self.with(rhs)
    }
}

impl BitOr for LevelFilter {
    type Output = LevelFilter;

    fn bitor(self, rhs: LevelFilter) -> LevelFilter {
        LevelFilter(self.0 | rhs.0)
    }
}

/// Parses `all`, `none`, or level names separated by `|` or `,`.
impl FromStr for LevelFilter {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::ALL);
        }
        if s.eq_ignore_ascii_case("none") || s.is_empty() {
            return Ok(LevelFilter::NONE);
        }
        s.split(['|', ','])
            .filter(|part| !part.trim().is_empty())
            .try_fold(LevelFilter::NONE, |acc, part| {
                part.parse::<LogLevel>().map(|level| acc.with(level))
            })
    }
}
