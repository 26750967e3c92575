//! # Habitual Core Library
//!
//! Scheduling logic for the Habitual habit tracker. Habit records come from
//! an external backend; this crate validates them once at the boundary and
//! then answers scheduling questions with pure functions.
//!
//! ## Architecture
//!
//! - **Recurrence Engine**: daily/weekly/monthly rules, time windows,
//!   occurrence counting and conflict detection on civil dates
//! - **Records**: conversion of stored habit records into validated values
//! - **Goals**: manual targets or targets derived from linked habits
//! - **Check-ins**: due lists, completion summaries and streaks
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Habit`]: a habit with its [`RecurrenceRule`] and active range
//! - [`ConflictDetector`]: groups habits with overlapping windows
//! - [`Goal`]: goal target and progress computation
//! - [`Config`]: application configuration management

pub mod checkin;
pub mod error;
pub mod goal;
pub mod record;
pub mod recurrence;
pub mod storage;

pub use checkin::{completion_summary, current_streak, due_on, CheckIn, CompletionSummary, DueHabit};
pub use error::{ConfigError, CoreError, ValidationError};
pub use goal::{find_goal, Goal, GoalProgress, GoalTarget};
pub use record::{find_habit, load_habits, validate_records, HabitRecord, RecordOutcome};
pub use recurrence::{
    count_occurrences, find_conflicts, is_scheduled_on, time_window_on, validate_time_window,
    ConflictDetector, ConflictGroup, ConflictGrouping, ConflictMember, DateRange, Habit,
    MonthlyEntry, RecurrenceKind, RecurrenceRule, TimeOfDay, TimeWindow, WeeklyEntry,
};
pub use storage::Config;
