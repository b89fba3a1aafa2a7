//! # Habitroom Core Library
//!
//! This library provides the core business logic for the Habitroom habit
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI layer being a thin
//! shell over the same core library.
//!
//! ## Architecture
//!
//! - **Recurrence Engine**: Pure calendar arithmetic that decides, for any
//!   date, whether a habit is due
//! - **Analytics**: Streak, completion-rate, and missed-day derivations
//!   computed from a habit's recurrence and its completion log
//! - **Gamification**: XP, levels, and badges awarded for consistency,
//!   expressed as a pure state transition
//! - **Storage**: A single storage port with swappable SQLite and JSON
//!   document backends, plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Habit`] and [`Recurrence`]: Habit definitions and due-date rules
//! - [`Tracker`]: The log-then-reward completion pipeline
//! - [`Store`]: Storage port trait implemented by [`SqliteStore`] and
//!   [`JsonStore`]
//! - [`Config`]: Application configuration management

pub mod agenda;
pub mod analytics;
pub mod error;
pub mod gamification;
pub mod habit;
pub mod insights;
pub mod storage;
pub mod tracker;

pub use agenda::{Priority, Project, Reminder};
pub use analytics::{completion_rate, current_streak, missed_in_window, MissReport};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use gamification::{
    level_for, next_level, process_completion, xp_for_completion, Badge, CompletionEvent,
    CompletionReward, Level, UserProgress,
};
pub use habit::{due_dates, Category, Habit, LogEntry, Recurrence};
pub use storage::{data_dir, Config, JsonStore, SqliteStore, Store, StorageBackend};
pub use tracker::{due_on, DueList, Tracker};
