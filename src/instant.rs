use std::str::FromStr;

use crate::{
    CalendarDate, DATE_TIME_SEPARATOR, FRACTION_SEPARATOR, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    MILLIS_PER_MINUTE, MILLIS_PER_SECOND, MINUTES_PER_HOUR, ParseError, SECONDS_PER_MINUTE,
    TIME_SEPARATOR, prelude::*,
};

const MAX_HOUR: u8 = 23;
const MAX_MINUTE: u8 = 59;
const MAX_SECOND: u8 = 59;
const MAX_MILLISECOND: u16 = 999;

/// Wall-clock time within a day, to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[display(fmt = "{hour:02}:{minute:02}:{second:02}.{millisecond:03}")]
pub struct TimeOfDay {
    hour:        u8,
    minute:      u8,
    second:      u8,
    millisecond: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self {
        hour:        0,
        minute:      0,
        second:      0,
        millisecond: 0,
    };

    /// # Errors
    /// Returns `ParseError::InvalidTime` if any component is out of range.
    pub fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Result<Self, ParseError> {
        if hour > MAX_HOUR
            || minute > MAX_MINUTE
            || second > MAX_SECOND
            || millisecond > MAX_MILLISECOND
        {
            return Err(ParseError::InvalidTime(format!(
                "{hour:02}:{minute:02}:{second:02}.{millisecond:03}"
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
            millisecond,
        })
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    pub const fn millisecond(&self) -> u16 {
        self.millisecond
    }

    /// Milliseconds elapsed since midnight
    pub const fn millis_since_midnight(&self) -> u64 {
        self.hour as u64 * MILLIS_PER_HOUR
            + self.minute as u64 * MILLIS_PER_MINUTE
            + self.second as u64 * MILLIS_PER_SECOND
            + self.millisecond as u64
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    /// Parses `HH:MM`, `HH:MM:SS` or `HH:MM:SS.mmm`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidTime(s.to_owned());
        let (clock, fraction) = match s.split_once(FRACTION_SEPARATOR) {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (s, None),
        };

        let field = |f: &str| f.parse::<u8>().map_err(|_| invalid());
        let parts: Vec<&str> = clock.split(TIME_SEPARATOR).collect();
        let (hour, minute, second) = match parts.as_slice() {
            [h, m] => (field(*h)?, field(*m)?, 0),
            [h, m, sec] => (field(*h)?, field(*m)?, field(*sec)?),
            _ => return Err(invalid()),
        };

        let millisecond = match fraction {
            None => 0,
            Some(f) if f.len() == 3 && f.bytes().all(|b| b.is_ascii_digit()) => {
                f.parse::<u16>().map_err(|_| invalid())?
            },
            Some(_) => return Err(invalid()),
        };

        Self::new(hour, minute, second, millisecond)
    }
}

/// A moment in naive local time: a civil date plus a wall-clock time.
///
/// Days are exactly `MILLIS_PER_DAY` long; time zones and daylight-saving
/// shifts are the caller's business when converting from a real clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{date}{}{time}", DATE_TIME_SEPARATOR)]
pub struct LocalInstant {
    date: CalendarDate,
    time: TimeOfDay,
}

impl LocalInstant {
    pub const fn new(date: CalendarDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    /// Midnight at the start of `date`
    pub const fn start_of_day(date: CalendarDate) -> Self {
        Self::new(date, TimeOfDay::MIDNIGHT)
    }

    pub const fn date(&self) -> CalendarDate {
        self.date
    }

    pub const fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Milliseconds since 1970-01-01T00:00 in the same naive local time.
    pub fn millis_since_epoch(&self) -> i64 {
        // Both factors are bounded by the year range, far below i64::MAX.
        self.date.days_since_epoch() * MILLIS_PER_DAY.cast_signed()
            + self.time.millis_since_midnight().cast_signed()
    }

    /// Signed milliseconds from `self` until `later`
    pub fn millis_until(&self, later: &Self) -> i64 {
        later.millis_since_epoch() - self.millis_since_epoch()
    }

    /// Moves the instant forward by `millis`, rolling over days as needed.
    pub fn add_millis(&self, millis: u64) -> Option<Self> {
        let total = self.time.millis_since_midnight().checked_add(millis)?;
        let days = i64::try_from(total / MILLIS_PER_DAY).ok()?;
        let date = self.date.add_days(days)?;
        Some(Self::new(date, Self::time_from_millis(total % MILLIS_PER_DAY)?))
    }

    fn time_from_millis(millis: u64) -> Option<TimeOfDay> {
        let hour = u8::try_from(millis / MILLIS_PER_HOUR).ok()?;
        let minute = u8::try_from(millis / MILLIS_PER_MINUTE % MINUTES_PER_HOUR).ok()?;
        let second = u8::try_from(millis / MILLIS_PER_SECOND % SECONDS_PER_MINUTE).ok()?;
        let millisecond = u16::try_from(millis % MILLIS_PER_SECOND).ok()?;
        TimeOfDay::new(hour, minute, second, millisecond).ok()
    }
}

impl From<CalendarDate> for LocalInstant {
    fn from(date: CalendarDate) -> Self {
        Self::start_of_day(date)
    }
}

impl FromStr for LocalInstant {
    type Err = ParseError;

    /// Parses `YYYY-MM-DD` (midnight) or `YYYY-MM-DDTHH:MM[:SS[.mmm]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        match trimmed.split_once(DATE_TIME_SEPARATOR) {
            Some((date, time)) => Ok(Self::new(date.parse()?, time.trim().parse()?)),
            None => Ok(Self::start_of_day(trimmed.parse()?)),
        }
    }
}

impl serde::Serialize for LocalInstant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for LocalInstant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
