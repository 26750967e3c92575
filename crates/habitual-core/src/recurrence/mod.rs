//! Recurrence engine.
//!
//! Answers, for a habit and a civil date or date range: is the habit
//! scheduled, in which time window, how many occurrences fall in the range,
//! and which habits have overlapping windows on a date.

mod conflict;
mod engine;
mod habit;
mod rule;
mod time;

pub use conflict::{find_conflicts, ConflictDetector, ConflictGroup, ConflictGrouping, ConflictMember};
pub use engine::{count_occurrences, is_scheduled_on, time_window_on};
pub use habit::{DateRange, Habit};
pub use rule::{weekday_from_number, weekday_number, MonthlyEntry, RecurrenceKind, RecurrenceRule, WeeklyEntry};
pub use time::{validate_time_window, TimeOfDay, TimeWindow};
