mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns the data directory, creating it when missing.
///
/// `RESPIRA_DATA_DIR` wins when set. Otherwise `~/.config/respira[-dev]/`
/// depending on `RESPIRA_ENV` (set `RESPIRA_ENV=dev` for the dev directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("RESPIRA_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RESPIRA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("respira-dev")
            } else {
                base_dir.join("respira")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
