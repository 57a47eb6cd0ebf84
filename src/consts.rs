/// Earliest valid year (inclusive)
pub const MIN_YEAR: u16 = 1;
/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Leap day, only present in leap years
pub const LEAP_DAY: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Days in one full 400-year Gregorian cycle
pub(crate) const DAYS_PER_GREGORIAN_CYCLE: i64 = 146_097;
/// Days from 0000-03-01 to 1970-01-01 in the proleptic Gregorian calendar
pub(crate) const UNIX_EPOCH_DAY_OFFSET: i64 = 719_468;

pub const MILLIS_PER_SECOND: u64 = 1_000;
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

pub const HOURS_PER_DAY: u64 = 24;
pub const MINUTES_PER_HOUR: u64 = 60;
pub const SECONDS_PER_MINUTE: u64 = 60;
pub const MONTHS_PER_YEAR: i32 = 12;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Separates the date from the time of day in an instant
pub const DATE_TIME_SEPARATOR: char = 'T';
/// Time component separator
pub const TIME_SEPARATOR: char = ':';
/// Separates seconds from milliseconds
pub const FRACTION_SEPARATOR: char = '.';
