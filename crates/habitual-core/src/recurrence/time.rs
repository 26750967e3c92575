//! Wall-clock times and time windows with minute resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time stored as minutes since midnight (`0..=1439`).
///
/// Parsed from `"HH:MM"` or `"HH:MM:SS"`; seconds are accepted and dropped.
/// Always rendered as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from an hour (`0..=23`) and minute (`0..=59`).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::recurrence_value(
                "time",
                format!("hour {hour} is outside 0..=23"),
            ));
        }
        if minute > 59 {
            return Err(ValidationError::recurrence_value(
                "time",
                format!("minute {minute} is outside 0..=59"),
            ));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Build from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, ValidationError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(ValidationError::recurrence_value(
                "time",
                format!("{minutes} minutes is past the end of the day"),
            ));
        }
        Ok(Self(minutes))
    }

    /// Parse `"HH:MM"` or `"HH:MM:SS"`. Surrounding whitespace is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || {
            ValidationError::recurrence_value(
                "time",
                format!("'{input}' is not a valid HH:MM or HH:MM:SS time"),
            )
        };

        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(invalid());
        }

        let mut numbers = [0u32; 3];
        for (idx, part) in parts.iter().enumerate() {
            // Hours may be a single digit ("9:05"), minutes and seconds may not.
            let width_ok = if idx == 0 {
                (1..=2).contains(&part.len())
            } else {
                part.len() == 2
            };
            if !width_ok || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            numbers[idx] = part.parse().map_err(|_| invalid())?;
        }

        if numbers[2] > 59 {
            return Err(invalid());
        }
        Self::from_hm(numbers[0], numbers[1]).map_err(|_| invalid())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A half-open window `[start, end)` within a single day.
///
/// `start < end` always holds; the only way to obtain one is through
/// [`validate_time_window`] (or the parsing helpers that call it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct TimeWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Deserialize)]
struct RawWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = ValidationError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        validate_time_window(raw.start, raw.end)
    }
}

/// Build a [`TimeWindow`], rejecting zero-length and inverted windows.
pub fn validate_time_window(start: TimeOfDay, end: TimeOfDay) -> Result<TimeWindow, ValidationError> {
    if start >= end {
        return Err(ValidationError::InvalidWindow { start, end });
    }
    Ok(TimeWindow { start, end })
}

impl TimeWindow {
    /// Parse both ends from strings and validate the pair.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        validate_time_window(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?)
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Half-open overlap: windows that only touch do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
