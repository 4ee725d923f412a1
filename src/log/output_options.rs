use std::{ops::BitOr, str::FromStr};

use crate::log::log_error::LogError;

/// Decoration flags applied when a sink renders a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputOptions(u8);

impl OutputOptions {
    pub const NONE: OutputOptions = OutputOptions(0x00);
    /// Prefix the line with the level tag.
    pub const WITH_LEVEL: OutputOptions = OutputOptions(0x01);
    /// Prefix the line with the rendered timestamp.
    pub const WITH_TIMESTAMP: OutputOptions = OutputOptions(0x02);
    /// Wrap timestamp and level tag in ANSI colors. Only honored by console destinations.
    pub const COLORIZE: OutputOptions = OutputOptions(0x04);
    pub const ALL: OutputOptions = OutputOptions(0xFF);

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
    pub const fn contains(self, other: OutputOptions) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[must_use]
    pub const fn union(self, other: OutputOptions) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn difference(self, other: OutputOptions) -> Self {
        Self(self.0 & !other.0)
    }
}

/// Level tag and timestamp, no color.
impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions::WITH_LEVEL.union(OutputOptions::WITH_TIMESTAMP)
    }
}

impl BitOr for OutputOptions {
    type Output = OutputOptions;

    fn bitor(self, rhs: OutputOptions) -> OutputOptions {
        self.union(rhs)
    }
}

impl FromStr for OutputOptions {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(OutputOptions::ALL);
        }
        if s.eq_ignore_ascii_case("none") || s.is_empty() {
            return Ok(OutputOptions::NONE);
        }
        s.split(['|', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(OutputOptions::NONE, |acc, part| {
                let flag = match part.to_ascii_lowercase().as_str() {
                    "level" => OutputOptions::WITH_LEVEL,
                    "timestamp" | "time" => OutputOptions::WITH_TIMESTAMP,
                    "colorize" | "color" => OutputOptions::COLORIZE,
                    _ => return Err(LogError::UnknownOption(part.to_string())),
                };
                Ok(acc | flag)
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn flags_are_independent() {
        let o = OutputOptions::WITH_LEVEL | OutputOptions::COLORIZE;
        assert!(o.contains(OutputOptions::WITH_LEVEL));
        assert!(o.contains(OutputOptions::COLORIZE));
        assert!(!o.contains(OutputOptions::WITH_TIMESTAMP));
        assert!(!o.contains(OutputOptions::NONE));
    }

    #[test]
    fn all_contains_every_flag() {
        assert!(OutputOptions::ALL.contains(OutputOptions::WITH_LEVEL));
        assert!(OutputOptions::ALL.contains(OutputOptions::WITH_TIMESTAMP));
        assert!(OutputOptions::ALL.contains(OutputOptions::COLORIZE));
    }

    #[test]
    fn parses_option_lists() {
        let o: OutputOptions = "timestamp | level".parse().unwrap();
        assert_eq!(o, OutputOptions::default());
        assert!(matches!(
            "level|sparkles".parse::<OutputOptions>(),
            Err(LogError::UnknownOption(_))
        ));
    }
}
