use chrono::{Datelike, Local, NaiveDate, TimeZone, Timelike};

use crate::log::log_error::{LogError, Result};

/// Current wall-clock time in whole Unix seconds.
#[must_use]
pub fn now() -> i64 {
    Local::now().timestamp()
}

/// How a timestamp is rendered: `YYYY-MM-DD HH:MM:SS` in local time by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimestampFormat {
    pub date_separator: char,
    pub time_separator: char,
    /// Between the date and the time.
    pub separator: char,
    /// Wrap the whole timestamp in `[` `]`.
    pub bracketed: bool,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            date_separator: '-',
            time_separator: ':',
            separator: ' ',
            bracketed: false,
        }
    }
}

impl TimestampFormat {
    #[must_use]
    pub fn bracketed() -> Self {
        Self {
            bracketed: true,
            ..Self::default()
        }
    }

    /// Renders `secs` (Unix seconds) in the local time zone.
    ///
    /// Falls back to `unix_<secs>` for instants the local zone cannot represent.
    #[must_use]
    pub fn render(&self, secs: i64) -> String {
        let Some(lt) = Local.timestamp_opt(secs, 0).single() else {
            return format!("unix_{secs}");
        };

        let (d, t) = (self.date_separator, self.time_separator);
        let body = format!(
            "{:04}{d}{:02}{d}{:02}{}{:02}{t}{:02}{t}{:02}",
            lt.year(),
            lt.month(),
            lt.day(),
            self.separator,
            lt.hour(),
            lt.minute(),
            lt.second()
        );

        if self.bracketed {
            format!("[{body}]")
        } else {
            body
        }
    }

    #[must_use]
    pub fn render_now(&self) -> String {
        self.render(now())
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS` positionally (offsets 0, 5, 8, 11, 14, 17)
/// and resolves it in the local time zone. Separator characters are not checked.
///
/// # Errors
///
/// [`LogError::InvalidDateTime`] if a field is missing, not a number, out of
/// range, or the local time does not exist (DST gap).
pub fn parse_local(s: &str) -> Result<i64> {
    let invalid = || LogError::InvalidDateTime(s.to_string());
    let field = |start: usize, len: usize| -> Result<u32> {
        s.get(start..start + len)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .ok_or_else(invalid)
    };

    let year = i32::try_from(field(0, 4)?).map_err(|_| invalid())?;
    let month = field(5, 2)?;
    let day = field(8, 2)?;
    let hour = field(11, 2)?;
    let minute = field(14, 2)?;
    let second = field(17, 2)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(invalid)?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(invalid)
}
