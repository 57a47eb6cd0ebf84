//! Calendar age: whole years, months and days between two civil dates.

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DateError, MONTHS_PER_YEAR, days_in_month, prelude::*};

/// Elapsed time between a birth date and a later date, as a person would count it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Display,
)]
#[display(fmt = "{years} years, {months} months, and {days} days")]
pub struct AgeBreakdown {
    pub years:  u16,
    /// Always in `0..12`
    pub months: u8,
    pub days:   u8,
}

impl AgeBreakdown {
    pub const ZERO: Self = Self {
        years:  0,
        months: 0,
        days:   0,
    };

    /// Whole months elapsed, ignoring the day remainder
    pub fn total_months(&self) -> u32 {
        u32::from(self.years) * 12 + u32::from(self.months)
    }
}

/// Computes the calendar age of someone born on `birth` as of `now`.
///
/// Works field by field the way people count birthdays: subtract years,
/// months and days, then borrow from the month before `now` when the day
/// difference is negative and from the year when the month difference is.
///
/// In a month too short for the birth day (the 31st against a 30-day month,
/// Feb 29 against a common-year February) the monthly anniversary falls on
/// that month's last day. Feb 29 births therefore turn a year older on
/// Feb 28 in common years, the same day [`crate::is_birthday`] reports.
///
/// # Errors
/// Returns `DateError::FutureBirthDate` if `birth` is after `now`.
pub fn age_between(birth: CalendarDate, now: CalendarDate) -> Result<AgeBreakdown, DateError> {
    if birth > now {
        return Err(DateError::FutureBirthDate { birth, now });
    }

    let mut years = i32::from(now.year()) - i32::from(birth.year());
    let mut months = i32::from(now.month()) - i32::from(birth.month());
    let mut days = i32::from(now.day()) - anniversary_day(birth, now.year(), now.month());

    if days < 0 {
        months -= 1;
        let (borrowed_month, wrapped) = now.month_typed().previous();
        let borrowed_year = now.year() - u16::from(wrapped);
        let borrowed_len = i32::from(days_in_month(borrowed_year, borrowed_month.get()));
        days = i32::from(now.day()) + borrowed_len
            - anniversary_day(birth, borrowed_year, borrowed_month.get());
    }
    if months < 0 {
        years -= 1;
        months += MONTHS_PER_YEAR;
    }

    tracing::trace!(%birth, %now, years, months, days, "computed age");

    // birth <= now keeps every field non-negative and in range
    Ok(AgeBreakdown {
        years:  u16::try_from(years).unwrap_or_default(),
        months: u8::try_from(months).unwrap_or_default(),
        days:   u8::try_from(days).unwrap_or_default(),
    })
}

/// The birth day-of-month as it falls in the given month.
fn anniversary_day(birth: CalendarDate, year: u16, month: u8) -> i32 {
    i32::from(birth.day().min(days_in_month(year, month)))
}
