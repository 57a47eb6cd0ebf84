mod age;
mod consts;
mod countdown;
mod instant;
mod occurrence;
mod prelude;
mod reminder;
mod report;
mod types;
mod zodiac;

pub use age::{AgeBreakdown, age_between};
pub use consts::*;
pub use countdown::{Countdown, countdown_to};
pub use instant::{LocalInstant, TimeOfDay};
pub use occurrence::{is_birthday, next_occurrence, occurrence_in};
pub use reminder::{
    BirthdayRecord, NotificationState, RecordBook, Reminder, ReminderKind, ReminderPolicy,
    due_reminders,
};
pub use report::BirthdayReport;
pub use types::{Day, Month, MonthDay, Year, is_leap_year};

pub(crate) use types::days_in_month;
pub use zodiac::{ZodiacSign, zodiac_sign};

use crate::consts::{DAYS_PER_GREGORIAN_CYCLE, GREGORIAN_CYCLE, UNIX_EPOCH_DAY_OFFSET};
use crate::prelude::*;
use std::str::FromStr;

/// A civil date (year, month, day) in local time, with no time-of-day component.
///
/// Every value is a real calendar date: the day is validated against the
/// month length of its year, so February 29 only exists in leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year}-{month}-{day}")]
pub struct CalendarDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Invalid time of day: {_0}")]
    InvalidTime(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Errors raised at the boundary before any date arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] ParseError),

    /// Age is only defined once the birth date has been reached.
    #[error("Birth date {birth} is after {now}")]
    FutureBirthDate { birth: CalendarDate, now: CalendarDate },

    #[error("No occurrence of {0} falls within the supported years")]
    BeyondMaxYear(CalendarDate),

    #[error("Name must not be empty")]
    EmptyName,
}

impl CalendarDate {
    /// Creates a date from raw components, validating each one.
    ///
    /// # Errors
    /// Returns `ParseError` for a year outside `MIN_YEAR..=MAX_YEAR`, a month
    /// outside 1-12, or a day that does not exist in that month.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_nz = Year::new(year)?;
        let month_nz = Month::new(month)?;
        let day_nz = Day::new(day, year, month)?;
        Ok(Self::from_parts(year_nz, month_nz, day_nz))
    }

    pub(crate) const fn from_parts(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Places `day` in the given year and month, clamping it to the month's
    /// last day when the month is shorter (Feb 29 becomes Feb 28 in a
    /// common year, the 31st becomes the 30th in April).
    pub fn clamped(year: Year, month: Month, day: u8) -> Self {
        Self::from_parts(year, month, Day::clamped(day, year, month))
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// The annual key of this date, e.g. `12-25`
    pub const fn month_day(&self) -> MonthDay {
        MonthDay::from_parts(self.month, self.day)
    }

    pub const fn is_leap_year(&self) -> bool {
        self.year.is_leap()
    }

    /// Number of days in this date's month
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    /// Days since 1970-01-01 in the proleptic Gregorian calendar.
    pub fn days_since_epoch(&self) -> i64 {
        let month = i64::from(self.month.get());
        let year = i64::from(self.year.get()) - i64::from(month <= i64::from(FEBRUARY));
        let era = year.div_euclid(i64::from(GREGORIAN_CYCLE));
        let year_of_era = year - era * i64::from(GREGORIAN_CYCLE);
        // Days counted from March 1st so the leap day falls at the end of the year.
        let shifted_month = (month + 9) % 12;
        let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(self.day.get()) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * DAYS_PER_GREGORIAN_CYCLE + day_of_era - UNIX_EPOCH_DAY_OFFSET
    }

    /// Inverse of [`Self::days_since_epoch`]. Returns `None` outside the
    /// supported year range.
    pub fn from_days_since_epoch(days: i64) -> Option<Self> {
        let shifted = days + UNIX_EPOCH_DAY_OFFSET;
        let era = shifted.div_euclid(DAYS_PER_GREGORIAN_CYCLE);
        let day_of_era = shifted - era * DAYS_PER_GREGORIAN_CYCLE;
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let shifted_month = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
        let month = if shifted_month < 10 {
            shifted_month + 3
        } else {
            shifted_month - 9
        };
        let year = year_of_era + era * i64::from(GREGORIAN_CYCLE) + i64::from(month <= 2);

        Self::new(
            u16::try_from(year).ok()?,
            u8::try_from(month).ok()?,
            u8::try_from(day).ok()?,
        )
        .ok()
    }

    /// Moves the date by a signed number of days.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        Self::from_days_since_epoch(self.days_since_epoch().checked_add(days)?)
    }

    /// Moves the date by a signed number of months, keeping the day-of-month
    /// where it exists and clamping it to the month's last day otherwise.
    pub fn add_months(&self, months: i64) -> Option<Self> {
        let index = i64::from(self.year.get()) * i64::from(MONTHS_PER_YEAR)
            + i64::from(self.month.get())
            - 1
            + months;
        let year = index.div_euclid(i64::from(MONTHS_PER_YEAR));
        let month = index.rem_euclid(i64::from(MONTHS_PER_YEAR)) + 1;
        let year = Year::new(u16::try_from(year).ok()?).ok()?;
        let month = Month::new(u8::try_from(month).ok()?).ok()?;
        Some(Self::clamped(year, month, self.day.get()))
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Parses an ISO 8601 calendar date, `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [year, month, day] => Self::new(parse_u16(year)?, parse_u8(month)?, parse_u8(day)?),
            _ if parts.len() > 3 => Err(ParseError::InvalidFormat(format!(
                "Too many {} separators: expected 2, found {}",
                DATE_SEPARATOR,
                parts.len() - 1
            ))),
            _ => Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, got {trimmed}"
            ))),
        }
    }
}

fn parse_u16(s: &str) -> Result<u16, ParseError> {
    s.parse::<u16>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

fn parse_u8(s: &str) -> Result<u8, ParseError> {
    s.parse::<u8>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = ParseError;

    fn try_from((year, month, day): (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(year, month, day)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        let parsed = "1991-08-15".parse::<CalendarDate>().unwrap();
        assert_eq!(parsed, date(1991, 8, 15));
        assert_eq!(parsed.year(), 1991);
        assert_eq!(parsed.month(), 8);
        assert_eq!(parsed.day(), 15);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let parsed = " 2000-02-29 ".parse::<CalendarDate>().unwrap();
        assert_eq!(parsed, date(2000, 2, 29));
    }

    #[test]
    fn test_parse_rejects_invalid_calendar_values() {
        assert!(matches!(
            "2023-13-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidMonth(13))
        ));
        assert!(matches!(
            "2023-00-10".parse::<CalendarDate>(),
            Err(ParseError::InvalidMonth(0))
        ));
        assert!(matches!(
            "2023-01-00".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay { day: 0, .. })
        ));
        assert!(matches!(
            "2023-02-29".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay {
                year: 2023,
                month: 2,
                day: 29
            })
        ));
        assert!(matches!(
            "0000-01-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidYear(0))
        ));
    }

    #[test]
    fn test_parse_bad_shapes() {
        assert!(matches!(
            "".parse::<CalendarDate>(),
            Err(ParseError::EmptyInput)
        ));
        assert!(matches!(
            "2023-08".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2023-08-XX".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        let err = "2000-01-15-23".parse::<CalendarDate>().unwrap_err();
        assert!(err.to_string().contains("Too many - separators"));
    }

    #[test]
    fn test_invalid_date_converts_into_date_error() {
        let err: DateError = "2023-02-30".parse::<CalendarDate>().unwrap_err().into();
        assert!(matches!(err, DateError::InvalidDate(ParseError::InvalidDay { .. })));
        assert_eq!(
            err.to_string(),
            "Invalid date: Invalid day 30 for month 2023-02"
        );
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(date(1991, 8, 5).to_string(), "1991-08-05");
        assert_eq!(date(7, 1, 1).to_string(), "0007-01-01");
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(date(1999, 12, 31) < date(2000, 1, 1));
        assert!(date(2000, 1, 31) < date(2000, 2, 1));
        assert!(date(2000, 2, 1) < date(2000, 2, 2));
    }

    #[test]
    fn test_days_since_epoch_known_values() {
        assert_eq!(date(1970, 1, 1).days_since_epoch(), 0);
        assert_eq!(date(1969, 12, 31).days_since_epoch(), -1);
        assert_eq!(date(2000, 1, 1).days_since_epoch(), 10_957);
        assert_eq!(date(2000, 3, 1).days_since_epoch(), 11_017);
        assert_eq!(date(2024, 2, 29).days_since_epoch(), 19_782);
    }

    #[test]
    fn test_epoch_days_are_contiguous_across_leap_years() {
        let mut current = date(1899, 12, 1);
        for _ in 0..(366 * 6) {
            let next = CalendarDate::from_days_since_epoch(current.days_since_epoch() + 1).unwrap();
            assert!(next > current, "{next} should follow {current}");
            if current.day() == current.days_in_month() {
                assert_eq!(next.day(), 1);
            } else {
                assert_eq!(next.day(), current.day() + 1);
            }
            current = next;
        }
    }

    #[test]
    fn test_from_days_since_epoch_out_of_range() {
        let last = date(9999, 12, 31).days_since_epoch();
        assert_eq!(CalendarDate::from_days_since_epoch(last + 1), None);
        let first = date(1, 1, 1).days_since_epoch();
        assert_eq!(CalendarDate::from_days_since_epoch(first - 1), None);
    }

    #[test]
    fn test_add_days() {
        assert_eq!(date(2023, 12, 31).add_days(1), Some(date(2024, 1, 1)));
        assert_eq!(date(2024, 2, 28).add_days(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2023, 2, 28).add_days(1), Some(date(2023, 3, 1)));
        assert_eq!(date(2023, 3, 1).add_days(-1), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(date(2023, 1, 31).add_months(1), Some(date(2023, 2, 28)));
        assert_eq!(date(2024, 1, 31).add_months(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2023, 1, 31).add_months(3), Some(date(2023, 4, 30)));
        assert_eq!(date(2023, 11, 15).add_months(2), Some(date(2024, 1, 15)));
        assert_eq!(date(2024, 1, 15).add_months(-1), Some(date(2023, 12, 15)));
        assert_eq!(date(2000, 2, 29).add_months(12 * 23), Some(date(2023, 2, 28)));
        assert_eq!(date(9999, 12, 1).add_months(1), None);
    }

    #[test]
    fn test_clamped_leap_day() {
        let feb = Month::new(2).unwrap();
        assert_eq!(
            CalendarDate::clamped(Year::new(2023).unwrap(), feb, 29),
            date(2023, 2, 28)
        );
        assert_eq!(
            CalendarDate::clamped(Year::new(2024).unwrap(), feb, 29),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_month_day_key() {
        assert_eq!(date(1990, 12, 25).month_day().to_string(), "12-25");
        assert!(date(2000, 2, 29).month_day().is_leap_day());
    }

    #[test]
    fn test_days_in_month_follows_the_date() {
        assert_eq!(date(2023, 2, 1).days_in_month(), 28);
        assert_eq!(date(2024, 2, 1).days_in_month(), 29);
        assert_eq!(date(2023, 12, 31).days_in_month(), 31);
        assert_eq!(date(2023, 4, 30).days_in_month(), 30);
    }

    #[test]
    fn test_try_from_tuple() {
        let d: CalendarDate = (1991, 8, 15).try_into().unwrap();
        assert_eq!(d, date(1991, 8, 15));
        let result: Result<CalendarDate, _> = (1991, 2, 30).try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_string_format() {
        let d = date(1991, 8, 15);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#""1991-08-15""#);
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);

        let result: Result<CalendarDate, _> = serde_json::from_str(r#""2023-02-29""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_YEAR, 9999);
        assert_eq!(MILLIS_PER_DAY, 86_400_000);
    }
}
