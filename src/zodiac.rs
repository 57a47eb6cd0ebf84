//! Western zodiac signs keyed by birth month and day.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, MonthDay, ParseError, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ZodiacSign {
    Capricorn,
    Aquarius,
    Pisces,
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
}

impl ZodiacSign {
    pub const ALL: [Self; 12] = [
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
    ];

    /// Finds the sign whose range contains `key`.
    ///
    /// The twelve ranges partition the year, so every key (02-29 included)
    /// has exactly one sign.
    pub fn from_month_day(key: MonthDay) -> Self {
        match (key.month().get(), key.day().get()) {
            (12, 22..) | (1, ..=19) => Self::Capricorn,
            (1, _) | (2, ..=18) => Self::Aquarius,
            (2, _) | (3, ..=20) => Self::Pisces,
            (3, _) | (4, ..=19) => Self::Aries,
            (4, _) | (5, ..=20) => Self::Taurus,
            (5, _) | (6, ..=20) => Self::Gemini,
            (6, _) | (7, ..=22) => Self::Cancer,
            (7, _) | (8, ..=22) => Self::Leo,
            (8, _) | (9, ..=22) => Self::Virgo,
            (9, _) | (10, ..=22) => Self::Libra,
            (10, _) | (11, ..=21) => Self::Scorpio,
            _ => Self::Sagittarius,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
        }
    }

    /// Short personality blurb shown next to the sign
    pub const fn traits(self) -> &'static str {
        match self {
            Self::Capricorn => "Responsible, disciplined, and steady; you build things that last.",
            Self::Aquarius => "Independent, inventive, and a little rebellious; you dream big.",
            Self::Pisces => "Sensitive, artistic, and compassionate; your heart feels deeply.",
            Self::Aries => "Brave, energetic, and adventurous; you lead with passion.",
            Self::Taurus => "Loyal, practical, and comfort-loving; you enjoy the finer things.",
            Self::Gemini => "Curious, quick-witted, and social; your mind never rests.",
            Self::Cancer => "Caring, protective, and intuitive; you cherish close bonds.",
            Self::Leo => "Warm, creative, and confident; you shine on the stage of life.",
            Self::Virgo => "Detail-focused, practical, and kind; you make things better.",
            Self::Libra => "Diplomatic, charming, and fair-minded; you value harmony.",
            Self::Scorpio => "Intense, brave, and magnetic; you feel things to the core.",
            Self::Sagittarius => "Adventurous, optimistic, and free-spirited; you seek truth.",
        }
    }

    /// First and last `(month, day)` of the sign, both inclusive. Capricorn's
    /// start is later in the year than its end because it spans New Year.
    pub const fn range(self) -> ((u8, u8), (u8, u8)) {
        match self {
            Self::Capricorn => ((12, 22), (1, 19)),
            Self::Aquarius => ((1, 20), (2, 18)),
            Self::Pisces => ((2, 19), (3, 20)),
            Self::Aries => ((3, 21), (4, 19)),
            Self::Taurus => ((4, 20), (5, 20)),
            Self::Gemini => ((5, 21), (6, 20)),
            Self::Cancer => ((6, 21), (7, 22)),
            Self::Leo => ((7, 23), (8, 22)),
            Self::Virgo => ((8, 23), (9, 22)),
            Self::Libra => ((9, 23), (10, 22)),
            Self::Scorpio => ((10, 23), (11, 21)),
            Self::Sagittarius => ((11, 22), (12, 21)),
        }
    }

    /// Whether `key` lies within this sign's range.
    pub fn contains(self, key: MonthDay) -> bool {
        let key = (key.month().get(), key.day().get());
        let (start, end) = self.range();
        if start > end {
            key >= start || key <= end
        } else {
            start <= key && key <= end
        }
    }
}

impl FromStr for ZodiacSign {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::InvalidFormat(format!("Unknown zodiac sign: {trimmed}")))
    }
}

/// The zodiac sign for someone born on `birth`.
pub fn zodiac_sign(birth: CalendarDate) -> ZodiacSign {
    ZodiacSign::from_month_day(birth.month_day())
}
