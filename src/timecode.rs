use std::fmt;
use std::str::FromStr;

use crate::errors::SubtitleError;

// @module: SubRip timestamp codec

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Millisecond-resolution time of day, stored as a signed offset from midnight.
///
/// Arithmetic never wraps: shifted values may go negative or past 24 hours and
/// still format without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Zero timestamp (`00:00:00,000`)
    pub const ZERO: Timestamp = Timestamp(0);

    /// Build from a raw millisecond count
    pub const fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    /// Build from clock components
    pub fn from_hmsm(hours: i64, minutes: i64, seconds: i64, millis: i64) -> Self {
        Timestamp(hours * MS_PER_HOUR + minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis)
    }

    /// Milliseconds since midnight
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Parse a strict 12-character `HH:MM:SS,mmm` timestamp
    pub fn parse(text: &str) -> Result<Self, SubtitleError> {
        let bytes = text.as_bytes();
        if bytes.len() != 12 || bytes[2] != b':' || bytes[5] != b':' || bytes[8] != b',' {
            return Err(SubtitleError::TimeFormat(text.to_string()));
        }

        let field = |range: std::ops::Range<usize>| -> Result<i64, SubtitleError> {
            let digits = &bytes[range];
            if !digits.iter().all(u8::is_ascii_digit) {
                return Err(SubtitleError::TimeFormat(text.to_string()));
            }
            Ok(digits.iter().fold(0i64, |acc, d| acc * 10 + i64::from(d - b'0')))
        };

        let hours = field(0..2)?;
        let minutes = field(3..5)?;
        let seconds = field(6..8)?;
        let millis = field(9..12)?;

        if minutes >= 60 || seconds >= 60 {
            return Err(SubtitleError::TimeFormat(text.to_string()));
        }

        Ok(Self::from_hmsm(hours, minutes, seconds, millis))
    }

    /// Add a (possibly negative) millisecond delta
    pub fn add_millis(self, delta: i64) -> Self {
        Timestamp(self.0.saturating_add(delta))
    }

    /// Signed distance `self - other` in milliseconds
    pub fn millis_since(self, other: Timestamp) -> i64 {
        self.0 - other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let ms = self.0.unsigned_abs();
        let hours = ms / MS_PER_HOUR as u64;
        let minutes = (ms % MS_PER_HOUR as u64) / MS_PER_MINUTE as u64;
        let seconds = (ms % MS_PER_MINUTE as u64) / MS_PER_SECOND as u64;
        let millis = ms % MS_PER_SECOND as u64;

        write!(f, "{}{:02}:{:02}:{:02},{:03}", sign, hours, minutes, seconds, millis)
    }
}

impl FromStr for Timestamp {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
