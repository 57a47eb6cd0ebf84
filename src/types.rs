use crate::consts::{
    CENTURY_CYCLE, DATE_SEPARATOR, DAYS_IN_MONTH, DECEMBER, FEBRUARY, GREGORIAN_CYCLE, JANUARY,
    LEAP_DAY, LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR,
};
use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::{NonZeroU16, NonZeroU8};
use std::str::FromStr;

/// A year value guaranteed to be in the range `MIN_YEAR..=MAX_YEAR` (1..=9999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's within `MIN_YEAR..=MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
            return Err(ParseError::InvalidYear(value));
        }
        NonZeroU16::new(value)
            .map(Self)
            .ok_or(ParseError::InvalidYear(value))
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    pub const fn is_leap(self) -> bool {
        is_leap_year(self.get())
    }

    /// The following year, or `None` past `MAX_YEAR`
    pub fn succ(self) -> Option<Self> {
        Self::new(self.get().checked_add(1)?).ok()
    }

    /// The preceding year, or `None` before `MIN_YEAR`
    pub fn pred(self) -> Option<Self> {
        Self::new(self.get().checked_sub(1)?).ok()
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.get())
    }
}

/// A month of the year, 1 (January) through 12 (December)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    pub const JANUARY: Self = Self(NonZeroU8::MIN);
    pub const DECEMBER: Self = match NonZeroU8::new(DECEMBER) {
        Some(m) => Self(m),
        None => unreachable!(),
    };

    /// Creates a new Month, validating that it's within `1..=MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        match NonZeroU8::new(value) {
            Some(m) if value <= MAX_MONTH => Ok(Self(m)),
            _ => Err(ParseError::InvalidMonth(value)),
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// The month before this one, wrapping January back to December.
    /// The flag is true when the wrap crosses into the previous year.
    pub const fn previous(self) -> (Self, bool) {
        if self.get() == JANUARY {
            (Self::DECEMBER, true)
        } else {
            match NonZeroU8::new(self.get() - 1) {
                Some(m) => (Self(m), false),
                None => (Self::DECEMBER, true),
            }
        }
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.get())
    }
}

/// A day of the month, validated against a specific year and month on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: u16, month: u8) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            year,
            month,
            day: value,
        };
        if month == 0 || month > MAX_MONTH || value > days_in_month(year, month) {
            return Err(invalid);
        }
        NonZeroU8::new(value).map(Self).ok_or(invalid)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Clamps `value` into the month: days past the end land on its last day.
    pub(crate) fn clamped(value: u8, year: Year, month: Month) -> Self {
        let last = days_in_month(year.get(), month.get());
        let day = value.clamp(MIN_DAY, last);
        NonZeroU8::new(day).map_or(Self(NonZeroU8::MIN), Self)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.get())
    }
}

/// An annual (month, day) key such as `12-25`, independent of any year.
///
/// February 29 is a valid key. Ordering matches the `MM-DD` string ordering,
/// so ranges of keys can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: Month,
    day: Day,
}

impl MonthDay {
    /// # Errors
    /// Returns `ParseError` if the month is invalid or the day does not exist
    /// in that month of a leap year.
    pub fn new(month: u8, day: u8) -> Result<Self, ParseError> {
        let month = Month::new(month)?;
        // A leap year admits every key, including 02-29.
        let day = Day::new(day, LEAP_REFERENCE_YEAR, month.get())?;
        Ok(Self { month, day })
    }

    pub(crate) const fn from_parts(month: Month, day: Day) -> Self {
        Self { month, day }
    }

    pub const fn month(self) -> Month {
        self.month
    }

    pub const fn day(self) -> Day {
        self.day
    }

    pub const fn is_leap_day(self) -> bool {
        self.month.get() == FEBRUARY && self.day.get() == LEAP_DAY
    }

    /// Every key of a leap year in calendar order, 366 in total
    pub fn all() -> impl Iterator<Item = Self> {
        (JANUARY..=MAX_MONTH).flat_map(|m| {
            (MIN_DAY..=days_in_month(LEAP_REFERENCE_YEAR, m))
                .filter_map(move |d| Self::new(m, d).ok())
        })
    }
}

/// Any leap year works here; only month lengths matter.
const LEAP_REFERENCE_YEAR: u16 = 2000;

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DATE_SEPARATOR}{}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let (month, day) = trimmed
            .split_once(DATE_SEPARATOR)
            .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let month = month
            .trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        let day = day
            .trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
        Self::new(month, day)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Length of `month` in `year`; callers pass a validated month.
pub(crate) const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        LEAP_DAY
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
