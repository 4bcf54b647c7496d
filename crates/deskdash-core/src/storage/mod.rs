mod config;
pub mod database;

pub use config::Config;
pub use database::{AdEventKind, AdStats, Database};

use std::path::PathBuf;

/// Returns `~/.config/deskdash[-dev]/` based on DESKDASH_ENV.
///
/// Set DESKDASH_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DESKDASH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("deskdash-dev")
    } else {
        base_dir.join("deskdash")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
