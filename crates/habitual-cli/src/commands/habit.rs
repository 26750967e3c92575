//! Habit schedule queries for CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use habitual_core::{
    completion_summary, current_streak, due_on, find_habit, validate_records, Config, DateRange,
    HabitRecord,
};
use serde_json::json;

use super::{habits_path, read_checkins, read_habits, today, CommandResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits due on a date
    Due {
        /// Habit records JSON file
        #[arg(long)]
        habits: Option<PathBuf>,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a habit's time window on a date
    Window {
        #[arg(long)]
        habits: Option<PathBuf>,
        /// Habit ID
        #[arg(long)]
        id: String,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Count scheduled occurrences in an inclusive date range
    Count {
        #[arg(long)]
        habits: Option<PathBuf>,
        /// Habit ID
        #[arg(long)]
        id: String,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Show the next scheduled date after a date
    Next {
        #[arg(long)]
        habits: Option<PathBuf>,
        /// Habit ID
        #[arg(long)]
        id: String,
        /// Search after this date (YYYY-MM-DD, default: today)
        #[arg(long)]
        after: Option<NaiveDate>,
    },
    /// Completion summary and current streak from check-ins
    Summary {
        #[arg(long)]
        habits: Option<PathBuf>,
        /// Check-in records JSON file
        #[arg(long)]
        checkins: Option<PathBuf>,
        /// Habit ID
        #[arg(long)]
        id: String,
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date and streak reference day (YYYY-MM-DD, default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate every habit record in a file
    Validate {
        #[arg(long)]
        habits: Option<PathBuf>,
    },
}

pub fn run(action: HabitAction) -> CommandResult {
    let config = Config::load()?;

    match action {
        HabitAction::Due { habits, date, json } => {
            let habits = read_habits(habits, &config)?;
            let date = date.unwrap_or_else(today);
            let due = due_on(&habits, date);
            if json {
                let rows: Vec<_> = due
                    .iter()
                    .map(|d| {
                        json!({
                            "id": d.habit.id,
                            "name": d.habit.name,
                            "start": d.window.start(),
                            "end": d.window.end(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if due.is_empty() {
                println!("Nothing due on {date}.");
            } else {
                for d in &due {
                    println!("{}  {}  {}", d.window, d.habit.id, d.habit.name);
                }
            }
        }
        HabitAction::Window { habits, id, date } => {
            let habits = read_habits(habits, &config)?;
            let habit = find_habit(&habits, &id)?;
            let date = date.unwrap_or_else(today);
            match habit.time_window_on(date) {
                Some(window) => println!("{window}"),
                None => println!("{id} is not scheduled on {date}"),
            }
        }
        HabitAction::Count { habits, id, from, to } => {
            let habits = read_habits(habits, &config)?;
            let habit = find_habit(&habits, &id)?;
            // An inverted range counts as empty rather than failing.
            println!("{}", habit.count_occurrences(DateRange { from, to }));
        }
        HabitAction::Next { habits, id, after } => {
            let habits = read_habits(habits, &config)?;
            let habit = find_habit(&habits, &id)?;
            let after = after.unwrap_or_else(today);
            let horizon = config.schedule.next_occurrence_horizon_days;
            match habit.next_occurrence(after, horizon) {
                Some(date) => {
                    let window = habit
                        .time_window_on(date)
                        .map(|w| w.to_string())
                        .unwrap_or_default();
                    println!("{date} {window}");
                }
                None => println!("No occurrence of {id} within {horizon} days after {after}"),
            }
        }
        HabitAction::Summary {
            habits,
            checkins,
            id,
            from,
            to,
            json,
        } => {
            let habits = read_habits(habits, &config)?;
            let checkins = read_checkins(checkins, &config)?;
            let habit = find_habit(&habits, &id)?;
            let to = to.unwrap_or_else(today);
            let summary = completion_summary(habit, &checkins, DateRange { from, to });
            let streak = current_streak(habit, &checkins, to);
            if json {
                let out = json!({ "id": habit.id, "summary": summary, "streak": streak });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "{}: {}/{} completed ({:.0}%), {} missed, streak {}",
                    habit.id,
                    summary.completed,
                    summary.scheduled,
                    summary.rate * 100.0,
                    summary.missed,
                    streak
                );
            }
        }
        HabitAction::Validate { habits } => {
            let path = habits_path(habits, &config)?;
            let records: Vec<HabitRecord> = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            let total = records.len();
            let outcomes = validate_records(records);
            let mut invalid = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(_) => println!("ok       {}", outcome.id),
                    Err(e) => {
                        invalid += 1;
                        println!("invalid  {}: {e}", outcome.id);
                    }
                }
            }
            if invalid > 0 {
                return Err(format!("{invalid} of {total} habit records are invalid").into());
            }
        }
    }
    Ok(())
}
