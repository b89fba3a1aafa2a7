//! CLI command implementations.

pub mod config;
pub mod habit;
pub mod log;
pub mod progress;
pub mod project;
pub mod reminder;
pub mod stats;
pub mod today;

use habitroom_core::storage::{open_store, Config};
use habitroom_core::Tracker;

/// Load configuration and open the configured storage backend.
pub(crate) fn open_tracker() -> Result<(Config, Tracker), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = open_store(&config)?;
    Ok((config, Tracker::new(store)))
}
