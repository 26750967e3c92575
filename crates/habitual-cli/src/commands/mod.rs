//! CLI commands and the file loading they share.
//!
//! Habit, goal and check-in data are JSON exports from the storage backend.
//! Paths come from the command line or, failing that, from the `data`
//! section of the configuration.

pub mod config;
pub mod conflicts;
pub mod goal;
pub mod habit;

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use habitual_core::{load_habits, CheckIn, Config, Goal, Habit};
use tracing::debug;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Today's civil date in the local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn resolve_path(
    explicit: Option<PathBuf>,
    configured: Option<&str>,
    what: &str,
    key: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    explicit
        .or_else(|| configured.map(PathBuf::from))
        .ok_or_else(|| format!("no {what} file given: pass --{what} or set {key}").into())
}

fn read_file(path: &Path) -> Result<String, Box<dyn Error>> {
    debug!(path = %path.display(), "reading export file");
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

pub fn habits_path(explicit: Option<PathBuf>, config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    resolve_path(explicit, config.data.habits_file.as_deref(), "habits", "data.habits_file")
}

pub fn read_habits(explicit: Option<PathBuf>, config: &Config) -> Result<Vec<Habit>, Box<dyn Error>> {
    let path = habits_path(explicit, config)?;
    Ok(load_habits(&read_file(&path)?)?)
}

pub fn read_goals(explicit: Option<PathBuf>, config: &Config) -> Result<Vec<Goal>, Box<dyn Error>> {
    let path = resolve_path(explicit, config.data.goals_file.as_deref(), "goals", "data.goals_file")?;
    Ok(serde_json::from_str(&read_file(&path)?)?)
}

pub fn read_checkins(explicit: Option<PathBuf>, config: &Config) -> Result<Vec<CheckIn>, Box<dyn Error>> {
    let path = resolve_path(
        explicit,
        config.data.checkins_file.as_deref(),
        "checkins",
        "data.checkins_file",
    )?;
    Ok(serde_json::from_str(&read_file(&path)?)?)
}
