//! Annual occurrences of a birth date.

use crate::{CalendarDate, LocalInstant, Year};

/// The date on which `birth` is celebrated in `year`.
///
/// Feb 29 births fall on Feb 28 in common years; every other month/day
/// exists in all years and is returned unchanged.
pub fn occurrence_in(birth: CalendarDate, year: Year) -> CalendarDate {
    CalendarDate::clamped(year, birth.month_typed(), birth.day())
}

/// Finds the next occurrence of `birth` strictly after `from`'s date.
///
/// An occurrence whose start-of-day is at or before `from` has already
/// begun, so on the birthday itself (at any time of day, midnight included)
/// the following year's occurrence is returned. Use [`is_birthday`] to ask
/// whether a given day is the birthday.
///
/// Returns `None` only when that occurrence would fall after `MAX_YEAR`.
pub fn next_occurrence(birth: CalendarDate, from: LocalInstant) -> Option<CalendarDate> {
    let this_year = occurrence_in(birth, from.date().year_typed());
    if LocalInstant::start_of_day(this_year) > from {
        return Some(this_year);
    }
    let next_year = from.date().year_typed().succ()?;
    Some(occurrence_in(birth, next_year))
}

/// Whether `today` is the day `birth` is celebrated in `today`'s year.
///
/// Compares calendar dates directly, so a caller ticking on a timer never
/// misses the day because a tick landed late.
pub fn is_birthday(birth: CalendarDate, today: CalendarDate) -> bool {
    occurrence_in(birth, today.year_typed()) == today
}
