//! Everything a display refresh needs, computed from one birth date and one instant.

use serde::Serialize;

use crate::{
    AgeBreakdown, CalendarDate, Countdown, DateError, LocalInstant, ZodiacSign, age_between,
    countdown_to, is_birthday, next_occurrence, zodiac_sign,
};

/// A snapshot of a birth date as seen from one instant.
///
/// Holds no state between ticks: a display loop calls [`BirthdayReport::at`]
/// with each new instant and renders the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthdayReport {
    pub birth:         CalendarDate,
    pub now:           LocalInstant,
    pub age:           AgeBreakdown,
    pub next_birthday: CalendarDate,
    pub countdown:     Countdown,
    pub zodiac:        ZodiacSign,
    /// `now` falls on the birthday. Checked by calendar date, not by the
    /// countdown reaching zero, so a late tick still sees it.
    pub is_birthday:   bool,
}

impl BirthdayReport {
    /// # Errors
    /// Returns `DateError::FutureBirthDate` if `birth` is after `now`, or
    /// `DateError::BeyondMaxYear` if the next birthday would fall after year 9999.
    pub fn at(birth: CalendarDate, now: LocalInstant) -> Result<Self, DateError> {
        let today = now.date();
        let age = age_between(birth, today)?;
        let next_birthday = next_occurrence(birth, now).ok_or(DateError::BeyondMaxYear(birth))?;
        let report = Self {
            birth,
            now,
            age,
            next_birthday,
            countdown: countdown_to(next_birthday, now),
            zodiac: zodiac_sign(birth),
            is_birthday: is_birthday(birth, today),
        };
        tracing::debug!(
            %birth,
            %now,
            %age,
            next = %report.next_birthday,
            countdown = %report.countdown,
            is_birthday = report.is_birthday,
            "computed birthday report"
        );
        Ok(report)
    }

    /// The age reached on the next birthday.
    pub fn turning(&self) -> u16 {
        self.age.years.saturating_add(1)
    }
}
