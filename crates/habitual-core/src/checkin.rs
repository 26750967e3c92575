//! Check-in views derived from the recurrence engine.
//!
//! A check-in only counts when it falls on a date the habit is scheduled on;
//! repeated check-ins for the same date count once.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::recurrence::{DateRange, Habit, TimeWindow};

/// A user's record of completing (or skipping) a habit on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub habit_id: String,
    pub date: NaiveDate,
    #[serde(default = "default_true")]
    pub completed: bool,
}

fn default_true() -> bool {
    true
}

/// A habit due on a date together with its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueHabit<'a> {
    pub habit: &'a Habit,
    pub window: TimeWindow,
}

/// Completion statistics of one habit over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionSummary {
    pub scheduled: u32,
    pub completed: u32,
    pub missed: u32,
    /// completed / scheduled, 0.0 when nothing was scheduled
    pub rate: f64,
}

/// Habits scheduled on `date`, ordered by window start then input order.
pub fn due_on(habits: &[Habit], date: NaiveDate) -> Vec<DueHabit<'_>> {
    let mut due: Vec<DueHabit<'_>> = habits
        .iter()
        .filter_map(|habit| {
            habit
                .time_window_on(date)
                .map(|window| DueHabit { habit, window })
        })
        .collect();
    due.sort_by_key(|entry| entry.window.start());
    due
}

/// Scheduled dates of `habit` that have a completed check-in.
pub fn completed_dates(habit: &Habit, checkins: &[CheckIn]) -> BTreeSet<NaiveDate> {
    checkins
        .iter()
        .filter(|c| c.completed && c.habit_id == habit.id && habit.is_scheduled_on(c.date))
        .map(|c| c.date)
        .collect()
}

pub fn completion_summary(habit: &Habit, checkins: &[CheckIn], range: DateRange) -> CompletionSummary {
    let scheduled = habit.count_occurrences(range);
    let completed = completed_dates(habit, checkins)
        .into_iter()
        .filter(|date| range.contains(*date))
        .count() as u32;
    let rate = if scheduled == 0 {
        0.0
    } else {
        f64::from(completed) / f64::from(scheduled)
    };
    CompletionSummary {
        scheduled,
        completed,
        missed: scheduled.saturating_sub(completed),
        rate,
    }
}

/// Consecutive completed occurrences ending at `today`.
///
/// An occurrence on `today` without a check-in does not break the streak;
/// the day is still open.
pub fn current_streak(habit: &Habit, checkins: &[CheckIn], today: NaiveDate) -> u32 {
    let done = completed_dates(habit, checkins);
    let mut cursor = match habit.active_until() {
        Some(until) if until < today => until,
        _ => today,
    };

    let mut streak = 0;
    while cursor >= habit.active_from() {
        if habit.is_scheduled_on(cursor) {
            if done.contains(&cursor) {
                streak += 1;
            } else if cursor != today {
                break;
            }
        }
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::recurrence::RecurrenceRule;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::parse(start, end).unwrap()
    }

    fn checkin(id: &str, day: NaiveDate) -> CheckIn {
        CheckIn {
            habit_id: id.to_string(),
            date: day,
            completed: true,
        }
    }

    fn mon_wed_fri() -> Habit {
        let rule = RecurrenceRule::weekly_on(&BTreeSet::from([1, 3, 5]), window("07:00", "07:30")).unwrap();
        Habit::new("gym", "Gym", rule, date(2024, 1, 1), None).unwrap()
    }

    #[test]
    fn due_on_sorts_by_window_start() {
        let late = Habit::new("late", "Late", RecurrenceRule::daily(window("20:00", "21:00")), date(2024, 1, 1), None)
            .unwrap();
        let habits = vec![late, mon_wed_fri()];
        let due = due_on(&habits, date(2024, 1, 3));
        let ids: Vec<_> = due.iter().map(|d| d.habit.id.as_str()).collect();
        assert_eq!(ids, vec!["gym", "late"]);

        let tuesday = due_on(&habits, date(2024, 1, 2));
        assert_eq!(tuesday.len(), 1);
        assert_eq!(tuesday[0].habit.id, "late");
    }

    #[test]
    fn summary_ignores_unscheduled_and_duplicate_checkins() {
        let habit = mon_wed_fri();
        let checkins = vec![
            checkin("gym", date(2024, 1, 1)),
            checkin("gym", date(2024, 1, 1)),
            checkin("gym", date(2024, 1, 2)), // Tuesday, not scheduled
            checkin("other", date(2024, 1, 3)),
            CheckIn {
                completed: false,
                ..checkin("gym", date(2024, 1, 5))
            },
        ];
        let first_week = DateRange::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
        let summary = completion_summary(&habit, &checkins, first_week);
        assert_eq!(summary.scheduled, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.missed, 2);
        assert!((summary.rate - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_empty_range_has_zero_rate() {
        let habit = mon_wed_fri();
        let range = DateRange { from: date(2024, 1, 7), to: date(2024, 1, 1) };
        let summary = completion_summary(&habit, &[], range);
        assert_eq!(summary.scheduled, 0);
        assert_eq!(summary.rate, 0.0);
    }

    #[test]
    fn streak_skips_unscheduled_days_and_open_today() {
        let habit = mon_wed_fri();
        let checkins = vec![
            checkin("gym", date(2024, 1, 3)),
            checkin("gym", date(2024, 1, 5)),
            checkin("gym", date(2024, 1, 8)),
        ];
        // Wednesday 10th not checked yet: streak still counts 3, 5, 8
        assert_eq!(current_streak(&habit, &checkins, date(2024, 1, 10)), 3);
        // Friday 12th: Wednesday 10th was missed
        assert_eq!(current_streak(&habit, &checkins, date(2024, 1, 12)), 0);
        // Monday 1st was missed so the streak starts at the 3rd
        assert_eq!(current_streak(&habit, &checkins, date(2024, 1, 9)), 3);
    }

    #[test]
    fn streak_of_ended_habit_counts_back_from_last_active_day() {
        let rule = RecurrenceRule::weekly_on(&BTreeSet::from([1, 3, 5]), window("07:00", "07:30")).unwrap();
        // Active until Wednesday 10th
        let habit = Habit::new("gym", "Gym", rule, date(2024, 1, 1), Some(date(2024, 1, 10))).unwrap();
        let checkins = vec![
            checkin("gym", date(2024, 1, 5)),
            checkin("gym", date(2024, 1, 8)),
            checkin("gym", date(2024, 1, 10)),
            checkin("gym", date(2024, 1, 12)), // after the habit ended
        ];
        assert_eq!(current_streak(&habit, &checkins, date(2024, 2, 1)), 3);

        // The last active day is not an open day once the habit has ended
        let missed_last = &checkins[..2];
        assert_eq!(current_streak(&habit, missed_last, date(2024, 2, 1)), 0);
    }
}
