use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use habitual_core::{Config, ConflictGrouping};

use super::{read_habits, today, CommandResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum GroupingArg {
    /// Group habits whose windows overlap, transitively
    Overlap,
    /// Group habits whose windows start at the same minute
    StartTime,
}

impl From<GroupingArg> for ConflictGrouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Overlap => ConflictGrouping::Overlap,
            GroupingArg::StartTime => ConflictGrouping::StartTime,
        }
    }
}

#[derive(Args)]
pub struct ConflictsArgs {
    /// Habit records JSON file
    #[arg(long)]
    habits: Option<PathBuf>,
    /// Date (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Grouping strategy (default: conflicts.grouping from config)
    #[arg(long, value_enum)]
    grouping: Option<GroupingArg>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ConflictsArgs) -> CommandResult {
    let config = Config::load()?;
    let habits = read_habits(args.habits, &config)?;
    let date = args.date.unwrap_or_else(today);

    let mut detector = config.conflict_detector();
    if let Some(grouping) = args.grouping {
        detector = detector.with_grouping(grouping.into());
    }
    let groups = detector.find_conflicts(&habits, date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No conflicts on {date}.");
        return Ok(());
    }
    for (idx, group) in groups.iter().enumerate() {
        println!("Conflict {} on {date}:", idx + 1);
        for member in &group.members {
            println!("  {}  {}  {}", member.window, member.habit_id, member.habit_name);
        }
    }
    Ok(())
}
