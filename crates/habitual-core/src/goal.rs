//! Goals with manual targets or targets derived from linked habits.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::checkin::{completed_dates, CheckIn};
use crate::error::{CoreError, Result};
use crate::recurrence::{DateRange, Habit};

/// How a goal's target is determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GoalTarget {
    /// Fixed target entered by the user
    Manual { value: u32 },
    /// Sum of the linked habits' occurrences over the goal span
    Auto { habit_ids: Vec<String> },
}

/// A target tracked over a date span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub target: GoalTarget,
    /// Progress recorded by hand; only used by manual goals.
    #[serde(default)]
    pub current: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub target: u32,
    pub achieved: u32,
    /// 0..=100
    pub percent: u8,
}

impl Goal {
    /// The goal's date span; inverted when `end_date < start_date`.
    pub fn span(&self) -> DateRange {
        DateRange {
            from: self.start_date,
            to: self.end_date,
        }
    }

    /// Target value: the manual value, or the number of scheduled
    /// occurrences of every linked habit within the span.
    ///
    /// Linked ids without a matching habit are skipped.
    pub fn resolve_target(&self, habits: &[Habit]) -> u32 {
        match &self.target {
            GoalTarget::Manual { value } => *value,
            GoalTarget::Auto { habit_ids } => self
                .linked_habits(habit_ids, habits)
                .map(|habit| habit.count_occurrences(self.span()))
                .sum(),
        }
    }

    /// Progress against the resolved target.
    ///
    /// Auto goals count completed check-ins of linked habits on scheduled
    /// dates inside the span.
    pub fn progress(&self, habits: &[Habit], checkins: &[CheckIn]) -> GoalProgress {
        let target = self.resolve_target(habits);
        let achieved = match &self.target {
            GoalTarget::Manual { .. } => self.current,
            GoalTarget::Auto { habit_ids } => {
                let span = self.span();
                self.linked_habits(habit_ids, habits)
                    .map(|habit| {
                        completed_dates(habit, checkins)
                            .into_iter()
                            .filter(|date| span.contains(*date))
                            .count() as u32
                    })
                    .sum()
            }
        };

        let percent = if target == 0 {
            0
        } else {
            (u64::from(achieved) * 100 / u64::from(target)).min(100) as u8
        };

        GoalProgress {
            target,
            achieved,
            percent,
        }
    }

    fn linked_habits<'a>(
        &'a self,
        habit_ids: &'a [String],
        habits: &'a [Habit],
    ) -> impl Iterator<Item = &'a Habit> + 'a {
        let by_id: HashMap<&str, &Habit> = habits.iter().map(|h| (h.id.as_str(), h)).collect();
        habit_ids.iter().filter_map(move |id| {
            let habit = by_id.get(id.as_str()).copied();
            if habit.is_none() {
                warn!(goal = %self.id, habit = %id, "goal links to unknown habit, skipping");
            }
            habit
        })
    }
}

/// Look up a goal by id.
pub fn find_goal<'a>(goals: &'a [Goal], id: &str) -> Result<&'a Goal> {
    goals
        .iter()
        .find(|goal| goal.id == id)
        .ok_or_else(|| CoreError::NotFound {
            kind: "goal",
            id: id.to_string(),
        })
}
