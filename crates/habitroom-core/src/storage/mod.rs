//! Storage port and backends.
//!
//! The core logic depends only on the [`Store`] trait; which backend is
//! active is a configuration detail. Two interchangeable implementations are
//! provided: SQLite ([`SqliteStore`]) and a JSON document file
//! ([`JsonStore`]).

mod config;
pub mod database;
pub mod json_store;
pub mod migrations;

pub use config::{AnalyticsConfig, Config, InsightsConfig, StorageBackend, StorageConfig};
pub use database::SqliteStore;
pub use json_store::JsonStore;

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::warn;

use crate::agenda::{Project, Reminder};
use crate::error::Result;
use crate::gamification::UserProgress;
use crate::habit::{Habit, LogEntry};

/// Returns `~/.config/habitroom[-dev]/` based on HABITROOM_ENV.
///
/// Set HABITROOM_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitroom-dev")
    } else {
        base_dir.join("habitroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Storage port: everything the core needs from a persistence backend.
///
/// Habit creation dates are immutable — `update_habit` never changes
/// `created_at`. The log enforces at most one entry per (habit, date);
/// `insert_log` rejects duplicates with
/// [`crate::CoreError::DuplicateCompletion`].
pub trait Store {
    fn add_habit(&mut self, habit: &Habit) -> Result<()>;
    fn get_habit(&self, id: &str) -> Result<Option<Habit>>;
    /// Habits newest-first; `active_only` filters out archived ones.
    fn list_habits(&self, active_only: bool) -> Result<Vec<Habit>>;
    /// Update name, category, recurrence, and target. `created_at` and
    /// `active` are not touched.
    fn update_habit(&mut self, habit: &Habit) -> Result<()>;
    /// Soft delete: the habit is excluded from active listings but its
    /// history is retained.
    fn archive_habit(&mut self, id: &str) -> Result<()>;

    fn insert_log(&mut self, entry: &LogEntry) -> Result<()>;
    fn logs_for_habit(&self, habit_id: &str) -> Result<Vec<LogEntry>>;
    fn logs_all(&self) -> Result<Vec<LogEntry>>;
    /// Count of log entries across all habits dated exactly `date`.
    fn count_logs_on(&self, date: NaiveDate) -> Result<u64>;

    fn add_reminder(&mut self, reminder: &Reminder) -> Result<()>;
    fn list_reminders(&self, pending_only: bool) -> Result<Vec<Reminder>>;
    fn set_reminder_completed(&mut self, id: &str, completed: bool) -> Result<()>;
    fn delete_reminder(&mut self, id: &str) -> Result<()>;

    fn add_project(&mut self, project: &Project) -> Result<()>;
    fn list_projects(&self, pending_only: bool) -> Result<Vec<Project>>;
    fn set_project_completed(&mut self, id: &str, completed: bool) -> Result<()>;
    fn delete_project(&mut self, id: &str) -> Result<()>;

    /// The singleton progress record; defaults to zero XP and no badges.
    fn progress(&self) -> Result<UserProgress>;
    fn put_progress(&mut self, progress: &UserProgress) -> Result<()>;
}

/// Open the backend selected in `config`.
///
/// If the JSON backend fails to open, falls back to SQLite rather than
/// refusing to start.
pub fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    match config.storage.backend {
        StorageBackend::Sqlite => Ok(Box::new(SqliteStore::open()?)),
        StorageBackend::Json => match JsonStore::open() {
            Ok(store) => Ok(Box::new(store)),
            Err(e) => {
                warn!("JSON store unavailable ({e}), falling back to SQLite");
                Ok(Box::new(SqliteStore::open()?))
            }
        },
    }
}
