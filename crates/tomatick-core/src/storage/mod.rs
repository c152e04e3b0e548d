mod config;

pub use config::{Config, DurationBounds, EngineConfig, PreferencesConfig, TimerSection};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the configuration directory.
///
/// `TOMATICK_CONFIG_DIR` wins if set; otherwise `~/.config/tomatick[-dev]/`
/// based on `TOMATICK_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if no home directory can be determined or if creating
/// the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TOMATICK_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?.join(".config");
            let env = std::env::var("TOMATICK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomatick-dev")
            } else {
                base_dir.join("tomatick")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
