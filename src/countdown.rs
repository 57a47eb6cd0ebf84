//! Time remaining until an occurrence, split into display units.

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, HOURS_PER_DAY, LocalInstant, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
    MILLIS_PER_SECOND, MINUTES_PER_HOUR, SECONDS_PER_MINUTE, prelude::*,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Display,
)]
#[display(fmt = "{days} days, {hours:02}:{minutes:02}:{seconds:02}")]
pub struct Countdown {
    pub days:         u64,
    pub hours:        u8,
    pub minutes:      u8,
    pub seconds:      u8,
    pub total_millis: u64,
}

impl Countdown {
    /// Splits a non-negative duration into whole days, hours, minutes and seconds.
    pub fn from_millis(total_millis: u64) -> Self {
        Self {
            days: total_millis / MILLIS_PER_DAY,
            hours: unit(total_millis / MILLIS_PER_HOUR % HOURS_PER_DAY),
            minutes: unit(total_millis / MILLIS_PER_MINUTE % MINUTES_PER_HOUR),
            seconds: unit(total_millis / MILLIS_PER_SECOND % SECONDS_PER_MINUTE),
            total_millis,
        }
    }

    /// True once the target instant has been reached.
    pub const fn has_arrived(&self) -> bool {
        self.total_millis == 0
    }
}

// Values reaching here are already reduced modulo 24 or 60.
fn unit(value: u64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// Time from `now` until midnight at the start of `target`, floored at zero.
pub fn countdown_to(target: CalendarDate, now: LocalInstant) -> Countdown {
    let remaining = now.millis_until(&LocalInstant::start_of_day(target));
    Countdown::from_millis(u64::try_from(remaining).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn instant(s: &str) -> LocalInstant {
        s.parse().unwrap()
    }

    #[test]
    fn test_decomposition() {
        let c = countdown_to(date("2023-08-15"), instant("2023-08-13T21:29:30.250"));
        assert_eq!(c.days, 1);
        assert_eq!(c.hours, 2);
        assert_eq!(c.minutes, 30);
        assert_eq!(c.seconds, 29);
        assert_eq!(
            c.total_millis,
            MILLIS_PER_DAY + 2 * MILLIS_PER_HOUR + 30 * MILLIS_PER_MINUTE + 29_750
        );
        assert!(!c.has_arrived());
    }

    #[test]
    fn test_zero_at_target_and_never_negative() {
        let target = date("2024-02-29");
        let at = countdown_to(target, instant("2024-02-29"));
        assert_eq!(at, Countdown::default());
        assert!(at.has_arrived());

        let after = countdown_to(target, instant("2024-02-29T09:00"));
        assert_eq!(after.total_millis, 0);
        assert!(after.has_arrived());
    }

    #[test]
    fn test_monotonically_non_increasing() {
        let target = date("2024-01-01");
        let mut now = instant("2023-12-30T22:00");
        let mut previous = countdown_to(target, now);
        for _ in 0..(60 * 30) {
            now = now.add_millis(97 * MILLIS_PER_SECOND).unwrap();
            let current = countdown_to(target, now);
            assert!(current.total_millis <= previous.total_millis);
            previous = current;
        }
        assert!(previous.has_arrived());
    }

    #[test]
    fn test_across_leap_day() {
        let c = countdown_to(date("2024-03-01"), instant("2024-02-28"));
        assert_eq!(c.days, 2);
        let c = countdown_to(date("2023-03-01"), instant("2023-02-28"));
        assert_eq!(c.days, 1);
    }

    #[test]
    fn test_display() {
        let c = countdown_to(date("2023-08-15"), instant("2023-08-05T20:54:03"));
        assert_eq!(c.to_string(), "9 days, 03:05:57");
    }
}
