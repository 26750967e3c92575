//! Habit and date range value types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rule::RecurrenceRule;
use crate::error::ValidationError;

/// A recurring activity with its schedule and active date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    rule: RecurrenceRule,
    active_from: NaiveDate,
    active_until: Option<NaiveDate>,
}

impl Habit {
    /// Create a habit; `active_until = None` means the habit never ends.
    ///
    /// Weekly and monthly rules without entries are rejected.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rule: RecurrenceRule,
        active_from: NaiveDate,
        active_until: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        rule.validate()?;
        if let Some(until) = active_until {
            if until < active_from {
                return Err(ValidationError::InvalidActiveRange {
                    from: active_from,
                    until,
                });
            }
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            rule,
            active_from,
            active_until,
        })
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    pub fn active_from(&self) -> NaiveDate {
        self.active_from
    }

    pub fn active_until(&self) -> Option<NaiveDate> {
        self.active_until
    }

    /// Whether `date` lies inside the habit's active range.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.active_from && self.active_until.map_or(true, |until| date <= until)
    }
}

/// Inclusive range of civil dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::EmptyRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// A single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Number of days in the range, 0 when inverted.
    pub fn len_days(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.to - self.from).num_days() as u64 + 1
        }
    }

    /// Ascending days of the range; nothing when inverted.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::TimeWindow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily() -> RecurrenceRule {
        RecurrenceRule::daily(TimeWindow::parse("08:00", "09:00").unwrap())
    }

    #[test]
    fn habit_rejects_end_before_start() {
        let err = Habit::new("h", "Run", daily(), date(2024, 2, 1), Some(date(2024, 1, 31))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidActiveRange { .. }));

        let single_day = Habit::new("h", "Run", daily(), date(2024, 2, 1), Some(date(2024, 2, 1)));
        assert!(single_day.is_ok());
    }

    #[test]
    fn habit_rejects_rule_without_entries() {
        let rule = RecurrenceRule::Monthly { entries: Vec::new() };
        let err = Habit::new("h", "Bills", rule, date(2024, 1, 1), None).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCollection(_)));
    }

    #[test]
    fn unbounded_habit_stays_active() {
        let habit = Habit::new("h", "Run", daily(), date(2024, 1, 1), None).unwrap();
        assert!(!habit.is_active_on(date(2023, 12, 31)));
        assert!(habit.is_active_on(date(2024, 1, 1)));
        assert!(habit.is_active_on(date(2099, 6, 1)));
    }

    #[test]
    fn date_range_basics() {
        assert!(matches!(
            DateRange::new(date(2024, 1, 2), date(2024, 1, 1)),
            Err(ValidationError::EmptyRange { .. })
        ));

        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 1)).unwrap();
        assert_eq!(range.len_days(), 4);
        assert_eq!(range.days().count(), 4);
        assert!(range.contains(date(2024, 2, 29)));

        let inverted = DateRange { from: date(2024, 1, 2), to: date(2024, 1, 1) };
        assert!(inverted.is_empty());
        assert_eq!(inverted.len_days(), 0);
        assert_eq!(inverted.days().count(), 0);
        assert_eq!(DateRange::day(date(2024, 1, 1)).len_days(), 1);
    }
}
