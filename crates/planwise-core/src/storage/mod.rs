mod config;
pub mod habit_store;

pub use config::{Config, ScheduleConfig};
pub use habit_store::HabitStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `PLANWISE_DATA_DIR` wins when set. Otherwise `~/.config/planwise[-dev]/`,
/// with the `-dev` suffix when `PLANWISE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PLANWISE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PLANWISE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("planwise-dev")
            } else {
                base_dir.join("planwise")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
