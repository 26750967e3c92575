//! Scheduling queries over a habit's recurrence rule and active range.
//!
//! All queries are pure and total: given a validated [`Habit`] they always
//! produce a value and never read the wall clock.

use chrono::{Days, NaiveDate};

use super::habit::{DateRange, Habit};
use super::time::TimeWindow;

impl Habit {
    /// Whether the habit is due on `date`.
    ///
    /// Dates outside the active range are never scheduled.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.is_active_on(date) && self.rule().matches(date)
    }

    /// Window the habit should be completed in on `date`, if scheduled.
    pub fn time_window_on(&self, date: NaiveDate) -> Option<TimeWindow> {
        if !self.is_active_on(date) {
            return None;
        }
        self.rule().window_for(date)
    }

    /// Intersection of `range` with the active range, `None` when empty.
    pub fn effective_range(&self, range: DateRange) -> Option<DateRange> {
        let from = range.from.max(self.active_from());
        let to = match self.active_until() {
            Some(until) => range.to.min(until),
            None => range.to,
        };
        (from <= to).then_some(DateRange { from, to })
    }

    /// Scheduled dates within `range`, ascending.
    pub fn occurrences(&self, range: DateRange) -> impl Iterator<Item = NaiveDate> + '_ {
        self.effective_range(range)
            .into_iter()
            .flat_map(|effective| effective.days())
            .filter(move |day| self.rule().matches(*day))
    }

    /// Number of scheduled dates within `range`; 0 for an empty intersection.
    ///
    /// Linear scan over the effective range so short-month handling of
    /// monthly rules stays identical to [`Habit::is_scheduled_on`].
    pub fn count_occurrences(&self, range: DateRange) -> u32 {
        self.occurrences(range).count() as u32
    }

    /// First scheduled date strictly after `after`, looking at most
    /// `horizon_days` days ahead.
    pub fn next_occurrence(&self, after: NaiveDate, horizon_days: u32) -> Option<NaiveDate> {
        let first = after.succ_opt()?;
        let last = after
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        self.occurrences(DateRange { from: first, to: last }).next()
    }
}

/// Functional form of [`Habit::is_scheduled_on`].
pub fn is_scheduled_on(habit: &Habit, date: NaiveDate) -> bool {
    habit.is_scheduled_on(date)
}

/// Functional form of [`Habit::time_window_on`].
pub fn time_window_on(habit: &Habit, date: NaiveDate) -> Option<TimeWindow> {
    habit.time_window_on(date)
}

/// Functional form of [`Habit::count_occurrences`].
pub fn count_occurrences(habit: &Habit, range: DateRange) -> u32 {
    habit.count_occurrences(range)
}
