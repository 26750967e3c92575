//! Daily, weekly and monthly recurrence rules.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::time::TimeWindow;
use crate::error::ValidationError;

/// Kind of recurrence, as stored in the `type` field of a habit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
}

/// Convert an external weekday number (1 = Monday .. 7 = Sunday).
pub fn weekday_from_number(number: u32) -> Result<Weekday, ValidationError> {
    match number {
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        7 => Ok(Weekday::Sun),
        other => Err(ValidationError::recurrence_value(
            "weekday",
            format!("{other} is outside 1..=7 (1 = Monday, 7 = Sunday)"),
        )),
    }
}

/// The external number of a weekday (1 = Monday .. 7 = Sunday).
pub fn weekday_number(weekday: Weekday) -> u32 {
    weekday.number_from_monday()
}

/// One weekday of a weekly rule with its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyEntry {
    weekday: Weekday,
    window: TimeWindow,
}

impl WeeklyEntry {
    pub fn new(weekday: Weekday, window: TimeWindow) -> Self {
        Self { weekday, window }
    }

    /// Build from an external weekday number (1 = Monday .. 7 = Sunday).
    pub fn from_number(number: u32, window: TimeWindow) -> Result<Self, ValidationError> {
        Ok(Self::new(weekday_from_number(number)?, window))
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }
}

/// One day of the month (1..=31) of a monthly rule with its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyEntry {
    day: u32,
    window: TimeWindow,
}

impl MonthlyEntry {
    pub fn new(day: u32, window: TimeWindow) -> Result<Self, ValidationError> {
        if !(1..=31).contains(&day) {
            return Err(ValidationError::recurrence_value(
                "day_of_month",
                format!("{day} is outside 1..=31"),
            ));
        }
        Ok(Self { day, window })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }
}

/// Schedule definition of a habit.
///
/// Weekly and monthly rules keep their entries in declared order; when more
/// than one entry matches a date, the first one supplies the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecurrenceRule {
    Daily { window: TimeWindow },
    Weekly { entries: Vec<WeeklyEntry> },
    Monthly { entries: Vec<MonthlyEntry> },
}

impl RecurrenceRule {
    pub fn daily(window: TimeWindow) -> Self {
        RecurrenceRule::Daily { window }
    }

    pub fn weekly(entries: Vec<WeeklyEntry>) -> Result<Self, ValidationError> {
        let rule = RecurrenceRule::Weekly { entries };
        rule.validate()?;
        Ok(rule)
    }

    pub fn monthly(entries: Vec<MonthlyEntry>) -> Result<Self, ValidationError> {
        let rule = RecurrenceRule::Monthly { entries };
        rule.validate()?;
        Ok(rule)
    }

    /// Reject weekly and monthly rules without entries.
    ///
    /// The variants can be built directly, so [`Habit::new`](super::Habit::new)
    /// checks this again.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            RecurrenceRule::Weekly { entries } if entries.is_empty() => Err(
                ValidationError::EmptyCollection("weekly schedule needs at least one weekday".into()),
            ),
            RecurrenceRule::Monthly { entries } if entries.is_empty() => Err(
                ValidationError::EmptyCollection("monthly schedule needs at least one day of month".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Weekly rule from a set of weekday numbers sharing one window.
    pub fn weekly_on(weekdays: &BTreeSet<u32>, window: TimeWindow) -> Result<Self, ValidationError> {
        let entries = weekdays
            .iter()
            .map(|&number| WeeklyEntry::from_number(number, window))
            .collect::<Result<Vec<_>, _>>()?;
        Self::weekly(entries)
    }

    /// Monthly rule from a set of days of month sharing one window.
    pub fn monthly_on(days: &BTreeSet<u32>, window: TimeWindow) -> Result<Self, ValidationError> {
        let entries = days
            .iter()
            .map(|&day| MonthlyEntry::new(day, window))
            .collect::<Result<Vec<_>, _>>()?;
        Self::monthly(entries)
    }

    pub fn kind(&self) -> RecurrenceKind {
        match self {
            RecurrenceRule::Daily { .. } => RecurrenceKind::Daily,
            RecurrenceRule::Weekly { .. } => RecurrenceKind::Weekly,
            RecurrenceRule::Monthly { .. } => RecurrenceKind::Monthly,
        }
    }

    /// Window of the first entry matching `date`, ignoring any active range.
    ///
    /// Monthly days past the end of a short month never match; there is no
    /// rollover into the next month.
    pub fn window_for(&self, date: NaiveDate) -> Option<TimeWindow> {
        match self {
            RecurrenceRule::Daily { window } => Some(*window),
            RecurrenceRule::Weekly { entries } => {
                let weekday = date.weekday();
                entries
                    .iter()
                    .find(|entry| entry.weekday == weekday)
                    .map(|entry| entry.window)
            }
            RecurrenceRule::Monthly { entries } => {
                let day = date.day();
                entries
                    .iter()
                    .find(|entry| entry.day == day)
                    .map(|entry| entry.window)
            }
        }
    }

    /// Whether the rule matches `date`, ignoring any active range.
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.window_for(date).is_some()
    }
}
