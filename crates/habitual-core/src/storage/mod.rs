//! Local configuration storage.
//!
//! Habit, goal and check-in records live in the external backend; the only
//! thing kept on disk here is the TOML configuration.

mod config;

pub use config::{Config, ConflictsConfig, DataConfig, ScheduleConfig};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `HABITUAL_HOME` wins when set. Otherwise `~/.config/habitual`, or
/// `~/.config/habitual-dev` with `HABITUAL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("HABITUAL_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITUAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitual-dev")
            } else {
                base_dir.join("habitual")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
