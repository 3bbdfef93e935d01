//! Remaining-duration snapshots and the units they are displayed in.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_HUNDREDTH, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};
use crate::instant::Millis;

/// A display unit of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Hundredths,
}

impl Unit {
    /// Caption shown under the digit group.
    ///
    /// Hundredths keep the "Milliseconds" caption the widget has always shown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Days => "Days",
            Self::Hours => "Hours",
            Self::Minutes => "Minutes",
            Self::Seconds => "Seconds",
            Self::Hundredths => "Milliseconds",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Hundredths => "hundredths",
        }
    }
}

pub const FULL_UNITS: [Unit; 4] = [Unit::Days, Unit::Hours, Unit::Minutes, Unit::Seconds];
pub const LAST_DAY_UNITS: [Unit; 4] = [Unit::Hours, Unit::Minutes, Unit::Seconds, Unit::Hundredths];

/// Time left until the target, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Remaining {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub hundredths: u8,
}

impl Remaining {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        hundredths: 0,
    };

    /// Decompose a positive millisecond difference; `None` once the target is reached.
    #[must_use]
    pub fn from_millis(diff: Millis) -> Option<Self> {
        if diff <= 0 {
            return None;
        }
        let part = |value: i64| u8::try_from(value).unwrap_or(u8::MAX);
        Some(Self {
            days: u64::try_from(diff / MILLIS_PER_DAY).unwrap_or(0),
            hours: part(diff / MILLIS_PER_HOUR % 24),
            minutes: part(diff / MILLIS_PER_MINUTE % 60),
            seconds: part(diff / MILLIS_PER_SECOND % 60),
            hundredths: part(diff % MILLIS_PER_SECOND / MILLIS_PER_HUNDREDTH),
        })
    }

    /// Recombine the units into milliseconds, dropping the sub-hundredth remainder.
    #[must_use]
    pub fn as_millis(&self) -> Millis {
        i64::try_from(self.days)
            .unwrap_or(i64::MAX / MILLIS_PER_DAY)
            .saturating_mul(MILLIS_PER_DAY)
            + i64::from(self.hours) * MILLIS_PER_HOUR
            + i64::from(self.minutes) * MILLIS_PER_MINUTE
            + i64::from(self.seconds) * MILLIS_PER_SECOND
            + i64::from(self.hundredths) * MILLIS_PER_HUNDREDTH
    }

    #[must_use]
    pub const fn is_last_day(&self) -> bool {
        self.days < 1
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.hundredths == 0
    }

    #[must_use]
    pub fn reading(&self, unit: Unit) -> u64 {
        match unit {
            Unit::Days => self.days,
            Unit::Hours => u64::from(self.hours),
            Unit::Minutes => u64::from(self.minutes),
            Unit::Seconds => u64::from(self.seconds),
            Unit::Hundredths => u64::from(self.hundredths),
        }
    }

    /// Zero-padded two-digit rendering of a unit; days may grow wider.
    #[must_use]
    pub fn padded(&self, unit: Unit) -> String {
        format!("{:02}", self.reading(unit))
    }
}
