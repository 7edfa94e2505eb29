pub mod database;
pub mod records;
mod settings;
mod store;

pub use database::Database;
pub use records::LegacySession;
pub use settings::Settings;
pub use store::{KvStore, MemoryStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/pomolog[-dev]/` based on POMOLOG_ENV, creating it
/// if needed. POMOLOG_DATA_DIR overrides the location entirely (used by
/// the test harness).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var("POMOLOG_DATA_DIR") {
        Ok(custom) => PathBuf::from(custom),
        Err(_) => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOLOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomolog-dev")
            } else {
                base_dir.join("pomolog")
            }
        }
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
