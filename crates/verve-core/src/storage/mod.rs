mod config;
pub mod kv;
mod persistence;

pub use config::{Config, GoogleConfig, SyncConfig};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::{Persistence, EVENTS_KEY, TOKEN_KEY};

use std::path::PathBuf;

/// Returns `~/.config/verve[-dev]/` based on VERVE_ENV.
///
/// Set VERVE_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("VERVE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("verve-dev")
    } else {
        base_dir.join("verve")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
