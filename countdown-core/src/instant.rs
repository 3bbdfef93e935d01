//! Points in time the countdown works with.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::MILLIS_PER_DAY;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// The instant the display counts down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetInstant(Millis);

impl TargetInstant {
    #[must_use]
    pub const fn from_millis(millis: Millis) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> Millis {
        self.0
    }

    /// Parse a target timestamp.
    ///
    /// RFC 3339 input carries its own offset. Naive date-times are read as
    /// wall-clock time at `local_offset`, the way a browser reads
    /// `new Date("2024-11-12T00:00:00")`. Bare `YYYY-MM-DD` dates mean UTC
    /// midnight, which is also what a browser does with a date-only string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] when the text matches none of the
    /// accepted shapes or names a wall-clock time the offset cannot resolve.
    pub fn parse(text: &str, local_offset: FixedOffset) -> Result<Self, ConfigError> {
        let trimmed = text.trim();
        let invalid = || ConfigError::InvalidTarget {
            input: text.to_string(),
        };
        if let Ok(stamped) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(stamped.timestamp_millis()));
        }
        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        {
            return local_offset
                .from_local_datetime(&naive)
                .single()
                .map(|resolved| Self(resolved.timestamp_millis()))
                .ok_or_else(invalid);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Self(midnight.and_utc().timestamp_millis()))
            .ok_or_else(invalid)
    }

    /// Move the target by whole days; negative values pull it closer.
    #[must_use]
    pub const fn shifted_by_days(self, days: i64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(MILLIS_PER_DAY)))
    }

    /// Signed distance from `now` to the target.
    #[must_use]
    pub const fn remaining_ms(self, now: Millis) -> Millis {
        self.0.saturating_sub(now)
    }
}

/// Build a fixed offset from minutes east of UTC, falling back to UTC when out of range.
#[must_use]
pub fn offset_from_minutes(minutes_east: i32) -> FixedOffset {
    minutes_east
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(utc_offset)
}

#[must_use]
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}
