//! Saved birthday lookups and the reminders they produce.
//!
//! The core never delivers anything: [`due_reminders`] reports which records
//! deserve a reminder at a given instant, and the caller marks each record
//! notified once it has shown the reminder.

use serde::{Deserialize, Serialize};

use crate::{
    AgeBreakdown, CalendarDate, Countdown, DateError, LocalInstant, MILLIS_PER_DAY, age_between,
    countdown_to, is_birthday, next_occurrence,
};

/// Which reminder a record was last notified with.
///
/// Ordered by when it is delivered for a given birthday: the heads-up comes
/// before the day itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Upcoming,
    Today,
}

/// Whether a record's reminder has been delivered, and for which birthday.
///
/// A record only moves forward: each `(occurrence, kind)` it is marked with
/// must be later than the last one. A record notified for one year's birthday
/// is pending again for the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NotificationState {
    #[default]
    Pending,
    Notified {
        occurrence: CalendarDate,
        kind:       ReminderKind,
    },
}

/// One saved lookup: who, when they were born, and when it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    name:         String,
    birth:        CalendarDate,
    saved_at:     LocalInstant,
    #[serde(default)]
    notification: NotificationState,
}

impl BirthdayRecord {
    /// # Errors
    /// Returns `DateError::EmptyName` for a blank name, or
    /// `DateError::FutureBirthDate` if `birth` is after `saved_at`.
    pub fn new(
        name: impl Into<String>,
        birth: CalendarDate,
        saved_at: LocalInstant,
    ) -> Result<Self, DateError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(DateError::EmptyName);
        }
        age_between(birth, saved_at.date())?;
        Ok(Self {
            name,
            birth,
            saved_at,
            notification: NotificationState::Pending,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn birth(&self) -> CalendarDate {
        self.birth
    }

    pub const fn saved_at(&self) -> LocalInstant {
        self.saved_at
    }

    pub const fn notification(&self) -> NotificationState {
        self.notification
    }

    /// Whether the `kind` reminder for the birthday on `occurrence` has been
    /// delivered, or superseded by a later one.
    pub fn is_notified_for(&self, occurrence: CalendarDate, kind: ReminderKind) -> bool {
        match self.notification {
            NotificationState::Pending => false,
            NotificationState::Notified {
                occurrence: last,
                kind: last_kind,
            } => (last, last_kind) >= (occurrence, kind),
        }
    }

    /// Age as of `now`
    ///
    /// # Errors
    /// Returns `DateError::FutureBirthDate` if `now` is before the birth date.
    pub fn age_at(&self, now: CalendarDate) -> Result<AgeBreakdown, DateError> {
        age_between(self.birth, now)
    }

    /// Records that the `kind` reminder for `occurrence` was delivered.
    /// Returns false, leaving the state alone, if it already was or a later
    /// reminder was.
    pub fn mark_notified(&mut self, occurrence: CalendarDate, kind: ReminderKind) -> bool {
        if self.is_notified_for(occurrence, kind) {
            return false;
        }
        self.notification = NotificationState::Notified { occurrence, kind };
        tracing::debug!(name = %self.name, %occurrence, ?kind, "record marked notified");
        true
    }
}

/// A short, ordered history of saved records, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBook {
    records: Vec<BirthdayRecord>,
}

impl RecordBook {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record and returns its index.
    pub fn push(&mut self, record: BirthdayRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<BirthdayRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&BirthdayRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BirthdayRecord> {
        self.records.get_mut(index)
    }

    /// The most recently saved record
    pub fn latest(&self) -> Option<&BirthdayRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BirthdayRecord> {
        self.records.iter()
    }

    /// Records with their indices, most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = (usize, &BirthdayRecord)> {
        self.records.iter().enumerate().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Marks the record `reminder` was raised for as notified with it.
    /// Returns false if there is no such record or it was already notified.
    pub fn mark_notified(&mut self, reminder: &Reminder) -> bool {
        self.records
            .get_mut(reminder.index())
            .is_some_and(|record| record.mark_notified(reminder.date(), reminder.kind()))
    }
}

/// How far ahead an upcoming birthday triggers a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderPolicy {
    pub window_millis: u64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            window_millis: MILLIS_PER_DAY,
        }
    }
}

/// A reminder the caller should deliver for the record at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reminder {
    /// Today is the birthday.
    Today {
        index:   usize,
        name:    String,
        date:    CalendarDate,
        turning: u16,
    },
    /// The next birthday starts within the policy window.
    Upcoming {
        index:     usize,
        name:      String,
        date:      CalendarDate,
        countdown: Countdown,
    },
}

impl Reminder {
    pub const fn index(&self) -> usize {
        match self {
            Self::Today { index, .. } | Self::Upcoming { index, .. } => *index,
        }
    }

    /// The birthday this reminder is about
    pub const fn date(&self) -> CalendarDate {
        match self {
            Self::Today { date, .. } | Self::Upcoming { date, .. } => *date,
        }
    }

    pub const fn kind(&self) -> ReminderKind {
        match self {
            Self::Today { .. } => ReminderKind::Today,
            Self::Upcoming { .. } => ReminderKind::Upcoming,
        }
    }

    /// Human-readable text for a toast or desktop notification
    pub fn message(&self) -> String {
        match self {
            Self::Today { name, turning, .. } => format!("{name} turns {turning} today!"),
            Self::Upcoming { name, date, .. } => {
                format!("{name}'s birthday is coming up on {date}!")
            },
        }
    }
}

/// Lists the reminders due at `now` for records that are still pending.
///
/// A record is due when its birthday is today, or when its next birthday
/// begins within `policy.window_millis` of `now`. Each birthday yields at
/// most one `Upcoming` and one `Today` reminder: once the caller passes a
/// delivered reminder to [`RecordBook::mark_notified`], later ticks skip it.
pub fn due_reminders(
    book: &RecordBook,
    now: LocalInstant,
    policy: ReminderPolicy,
) -> Vec<Reminder> {
    let today = now.date();
    let mut due = Vec::new();

    for (index, record) in book.iter().enumerate() {
        if is_birthday(record.birth, today) {
            if record.is_notified_for(today, ReminderKind::Today) {
                continue;
            }
            match record.age_at(today) {
                Ok(age) => due.push(Reminder::Today {
                    index,
                    name: record.name.clone(),
                    date: today,
                    turning: age.years,
                }),
                Err(e) => tracing::debug!(name = %record.name, error = %e, "skipping record"),
            }
            continue;
        }

        let Some(next) = next_occurrence(record.birth, now) else {
            continue;
        };
        if record.is_notified_for(next, ReminderKind::Upcoming) {
            continue;
        }
        let countdown = countdown_to(next, now);
        if !countdown.has_arrived() && countdown.total_millis <= policy.window_millis {
            due.push(Reminder::Upcoming {
                index,
                name: record.name.clone(),
                date: next,
                countdown,
            });
        }
    }

    tracing::debug!(%now, due = due.len(), "checked records for reminders");
    due
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

    fn record(name: &str, birth: &str) -> BirthdayRecord {
        BirthdayRecord::new(name, date(birth), instant("2023-01-01T10:00")).unwrap()
    }

    fn book() -> RecordBook {
        let mut book = RecordBook::new();
        book.push(record("Ada", "1990-08-16"));
        book.push(record("Grace", "1985-08-15"));
        book.push(record("Linus", "1969-12-28"));
        book
    }

    #[test]
    fn test_record_validation() {
        assert!(matches!(
            BirthdayRecord::new("   ", date("1990-01-01"), instant("2023-01-01")),
            Err(DateError::EmptyName)
        ));
        assert!(matches!(
            BirthdayRecord::new("Ada", date("2024-01-01"), instant("2023-01-01")),
            Err(DateError::FutureBirthDate { .. })
        ));
        let r = BirthdayRecord::new("  Ada ", date("1990-01-01"), instant("2023-01-01")).unwrap();
        assert_eq!(r.name(), "Ada");
        assert_eq!(r.notification(), NotificationState::Pending);
    }

    #[test]
    fn test_mark_notified_only_moves_forward() {
        let mut r = record("Ada", "1990-08-16");
        let birthday = date("2023-08-16");
        assert!(!r.is_notified_for(birthday, ReminderKind::Upcoming));

        assert!(r.mark_notified(birthday, ReminderKind::Upcoming));
        assert!(r.is_notified_for(birthday, ReminderKind::Upcoming));
        assert!(!r.is_notified_for(birthday, ReminderKind::Today));
        assert!(!r.mark_notified(birthday, ReminderKind::Upcoming));

        assert!(r.mark_notified(birthday, ReminderKind::Today));
        assert!(!r.mark_notified(birthday, ReminderKind::Upcoming));
        assert_eq!(
            r.notification(),
            NotificationState::Notified {
                occurrence: birthday,
                kind:       ReminderKind::Today,
            }
        );

        assert!(!r.is_notified_for(date("2024-08-16"), ReminderKind::Upcoming));
        assert!(!r.mark_notified(date("2022-08-16"), ReminderKind::Today));
    }

    #[test]
    fn test_record_book_order_and_removal() {
        let mut b = book();
        assert_eq!(b.len(), 3);
        assert_eq!(b.latest().unwrap().name(), "Linus");

        let names: Vec<&str> = b.newest_first().map(|(_, r)| r.name()).collect();
        assert_eq!(names, ["Linus", "Grace", "Ada"]);

        let removed = b.remove(1).unwrap();
        assert_eq!(removed.name(), "Grace");
        assert_eq!(b.get(1).unwrap().name(), "Linus");
        assert!(b.remove(5).is_none());
        let missing = Reminder::Today {
            index:   5,
            name:    "Nobody".to_owned(),
            date:    date("2023-08-16"),
            turning: 1,
        };
        assert!(!b.mark_notified(&missing));
    }

    #[test]
    fn test_due_reminders_today_and_upcoming() {
        let b = book();
        let due = due_reminders(&b, instant("2023-08-15T09:00"), ReminderPolicy::default());
        assert_eq!(due.len(), 2);

        assert_eq!(
            due[0],
            Reminder::Upcoming {
                index:     0,
                name:      "Ada".to_owned(),
                date:      date("2023-08-16"),
                countdown: Countdown::from_millis(15 * 3_600_000),
            }
        );
        assert_eq!(due[0].message(), "Ada's birthday is coming up on 2023-08-16!");

        assert_eq!(due[1].index(), 1);
        assert_eq!(due[1].kind(), ReminderKind::Today);
        assert_eq!(due[1].date(), date("2023-08-15"));
        assert_eq!(due[1].message(), "Grace turns 38 today!");
    }

    #[test]
    fn test_notified_records_are_skipped() {
        let mut b = book();
        let now = instant("2023-08-15T09:00");
        for reminder in due_reminders(&b, now, ReminderPolicy::default()) {
            assert!(b.mark_notified(&reminder));
        }
        assert!(due_reminders(&b, now, ReminderPolicy::default()).is_empty());
    }

    #[test]
    fn test_eve_then_birthday_then_next_year() {
        let mut b = RecordBook::new();
        b.push(record("Ada", "1990-08-16"));
        let policy = ReminderPolicy::default();

        let eve = instant("2023-08-15T09:00");
        let due = due_reminders(&b, eve, policy);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].message(), "Ada's birthday is coming up on 2023-08-16!");
        assert!(b.mark_notified(&due[0]));
        assert!(due_reminders(&b, eve, policy).is_empty());

        let birthday = instant("2023-08-16T09:00");
        let due = due_reminders(&b, birthday, policy);
        assert_eq!(
            due,
            [Reminder::Today {
                index:   0,
                name:    "Ada".to_owned(),
                date:    date("2023-08-16"),
                turning: 33,
            }]
        );
        assert!(b.mark_notified(&due[0]));
        assert!(due_reminders(&b, birthday, policy).is_empty());
        assert!(due_reminders(&b, instant("2023-08-16T23:59"), policy).is_empty());

        let next_eve = due_reminders(&b, instant("2024-08-15T09:00"), policy);
        assert_eq!(next_eve.len(), 1);
        assert_eq!(next_eve[0].kind(), ReminderKind::Upcoming);
        assert_eq!(next_eve[0].date(), date("2024-08-16"));
    }

    #[test]
    fn test_today_reminder_without_prior_heads_up() {
        let mut b = RecordBook::new();
        b.push(record("Ada", "1990-08-16"));
        let due = due_reminders(&b, instant("2023-08-16T20:00"), ReminderPolicy::default());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].kind(), ReminderKind::Today);
        assert!(b.mark_notified(&due[0]));

        // The upcoming reminder for the same birthday is already past.
        let stale = Reminder::Upcoming {
            index:     0,
            name:      "Ada".to_owned(),
            date:      date("2023-08-16"),
            countdown: Countdown::from_millis(MILLIS_PER_DAY),
        };
        assert!(!b.mark_notified(&stale));
    }

    #[test]
    fn test_window_bounds() {
        let b = book();
        // Ada's birthday starts in exactly one day.
        let due = due_reminders(&b, instant("2023-08-15"), ReminderPolicy::default());
        assert!(due.iter().any(|r| r.index() == 0));

        let due = due_reminders(&b, instant("2023-08-14T23:59:59.999"), ReminderPolicy::default());
        assert!(due.iter().all(|r| r.index() != 0));

        let wide = ReminderPolicy {
            window_millis: 7 * MILLIS_PER_DAY,
        };
        let due = due_reminders(&b, instant("2023-12-22"), wide);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].index(), 2);
    }

    #[test]
    fn test_serde_round_trip_keeps_state() {
        let mut b = book();
        b.get_mut(2)
            .unwrap()
            .mark_notified(date("2023-12-28"), ReminderKind::Upcoming);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(
            r#""notification":{"state":"notified","occurrence":"2023-12-28","kind":"upcoming"}"#
        ));
        assert!(json.contains(r#""notification":{"state":"pending"}"#));
        let parsed: RecordBook = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, b);

        let legacy =
            r#"[{"name":"Ada","birth":"1990-08-16","saved_at":"2023-01-01T10:00:00.000"}]"#;
        let parsed: RecordBook = serde_json::from_str(legacy).unwrap();
        assert_eq!(parsed.get(0).unwrap().notification(), NotificationState::Pending);
    }

    #[test]
    fn test_policy_defaults_when_deserialized_empty() {
        let policy: ReminderPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ReminderPolicy::default());
    }
}
