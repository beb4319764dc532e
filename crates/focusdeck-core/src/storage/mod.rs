mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::{Database, DayStats, ModeStats};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding `config.toml` and `focusdeck.db`.
///
/// `FOCUSDECK_DATA_DIR` wins when set. Otherwise `~/.config/focusdeck[-dev]/`
/// is used, with the `-dev` suffix selected by `FOCUSDECK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSDECK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSDECK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusdeck-dev")
            } else {
                base_dir.join("focusdeck")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
