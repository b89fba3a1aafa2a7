//! Configuration management commands.

use clap::Subcommand;
use habitroom_core::storage::{Config, StorageBackend};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Print the config file path
    Path,
    /// Set the storage backend (sqlite or json)
    Backend {
        /// Backend name
        backend: String,
    },
    /// Set the default missed-day analysis window
    Window {
        /// Window in days
        days: u32,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Backend { backend } => {
            let mut config = Config::load()?;
            config.storage.backend = match backend.to_ascii_lowercase().as_str() {
                "sqlite" => StorageBackend::Sqlite,
                "json" => StorageBackend::Json,
                other => return Err(format!("unknown backend '{other}'").into()),
            };
            config.save()?;
            println!("Storage backend set to {backend}");
        }
        ConfigAction::Window { days } => {
            if days == 0 {
                return Err("window must be at least 1 day".into());
            }
            let mut config = Config::load()?;
            config.analytics.window_days = days;
            config.save()?;
            println!("Missed-day window set to {days} days");
        }
    }
    Ok(())
}
