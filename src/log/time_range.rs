use crate::log::{
    log_error::{LogError, Result},
    timestamp,
};

/// A closed interval `[start, end]` of Unix seconds, or no restriction at all.
///
/// The default range is unrestricted and contains every timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeRange {
    bounds: Option<(i64, i64)>,
}

impl TimeRange {
    /// The unrestricted range.
    #[must_use]
    pub const fn all() -> Self {
        Self { bounds: None }
    }

    /// # Errors
    ///
    /// [`LogError::InvalidTimeRange`] if `start > end`.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(LogError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            bounds: Some((start, end)),
        })
    }

    /// Builds a range from two `YYYY-MM-DD HH:MM:SS` local-time strings.
    ///
    /// # Errors
    ///
    /// [`LogError::InvalidDateTime`] if either string does not parse, or
    /// [`LogError::InvalidTimeRange`] if start is after end.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(timestamp::parse_local(start)?, timestamp::parse_local(end)?)
    }

    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.bounds.is_some()
    }

    #[must_use]
    pub const fn start(&self) -> Option<i64> {
        match self.bounds {
            Some((start, _)) => Some(start),
            None => None,
        }
    }

    #[must_use]
    pub const fn end(&self) -> Option<i64> {
        match self.bounds {
            Some((_, end)) => Some(end),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, t: i64) -> bool {
        match self.bounds {
            Some((start, end)) => start <= t && t <= end,
            None => true,
        }
    }

    /// # Errors
    ///
    /// [`LogError::InvalidDateTime`] if `s` does not parse.
    pub fn contains_str(&self, s: &str) -> Result<bool> {
        Ok(self.contains(timestamp::parse_local(s)?))
    }
}
