//! Goal target and progress commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use habitual_core::{find_goal, Config, Goal};
use serde_json::json;

use super::{read_checkins, read_goals, read_habits, CommandResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Resolve goal targets from linked habits
    Target {
        /// Habit records JSON file
        #[arg(long)]
        habits: Option<PathBuf>,
        /// Goals JSON file
        #[arg(long)]
        goals: Option<PathBuf>,
        /// Only this goal
        #[arg(long)]
        id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show progress of goals against their targets
    Progress {
        #[arg(long)]
        habits: Option<PathBuf>,
        #[arg(long)]
        goals: Option<PathBuf>,
        /// Check-in records JSON file
        #[arg(long)]
        checkins: Option<PathBuf>,
        /// Only this goal
        #[arg(long)]
        id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn select<'a>(goals: &'a [Goal], id: Option<&str>) -> Result<Vec<&'a Goal>, Box<dyn std::error::Error>> {
    match id {
        Some(id) => Ok(vec![find_goal(goals, id)?]),
        None => Ok(goals.iter().collect()),
    }
}

pub fn run(action: GoalAction) -> CommandResult {
    let config = Config::load()?;

    match action {
        GoalAction::Target {
            habits,
            goals,
            id,
            json,
        } => {
            let habits = read_habits(habits, &config)?;
            let goals = read_goals(goals, &config)?;
            let selected = select(&goals, id.as_deref())?;
            if json {
                let rows: Vec<_> = selected
                    .iter()
                    .map(|g| json!({ "id": g.id, "title": g.title, "target": g.resolve_target(&habits) }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for goal in selected {
                    println!("{}  {}  {}", goal.id, goal.resolve_target(&habits), goal.title);
                }
            }
        }
        GoalAction::Progress {
            habits,
            goals,
            checkins,
            id,
            json,
        } => {
            let habits = read_habits(habits, &config)?;
            let goals = read_goals(goals, &config)?;
            let checkins = read_checkins(checkins, &config)?;
            let selected = select(&goals, id.as_deref())?;
            if json {
                let rows: Vec<_> = selected
                    .iter()
                    .map(|g| json!({ "id": g.id, "title": g.title, "progress": g.progress(&habits, &checkins) }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for goal in selected {
                    let progress = goal.progress(&habits, &checkins);
                    println!(
                        "{}  {}/{} ({}%)  {}",
                        goal.id, progress.achieved, progress.target, progress.percent, goal.title
                    );
                }
            }
        }
    }
    Ok(())
}
