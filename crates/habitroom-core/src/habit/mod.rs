//! Habit definitions and completion log entries.

mod recurrence;

pub use recurrence::{due_dates, DueDates, Recurrence};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of habit for organizing the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Productivity,
    Learning,
    Mindfulness,
    #[default]
    Other,
}

impl Category {
    /// Database string for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Productivity => "productivity",
            Category::Learning => "learning",
            Category::Mindfulness => "mindfulness",
            Category::Other => "other",
        }
    }

    /// Parse a category from its database string.
    ///
    /// Unknown strings map to [`Category::Other`] rather than failing, so a
    /// habit with a stale category label still loads.
    pub fn parse(s: &str) -> Category {
        match s.to_ascii_lowercase().as_str() {
            "health" => Category::Health,
            "productivity" => Category::Productivity,
            "learning" => Category::Learning,
            "mindfulness" => Category::Mindfulness,
            _ => Category::Other,
        }
    }
}

/// A recurring habit.
///
/// The creation date is immutable once set: no habit is ever due before its
/// own `created_at`. Archiving sets `active = false` (soft delete); archived
/// habits are excluded from due-today views but retained for history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub recurrence: Recurrence,
    /// Target amount per due day (e.g. 8 glasses). Positive, defaults to 1.
    pub target_value: u32,
    /// Unit for the target amount, defaults to "times".
    pub target_unit: String,
    pub created_at: NaiveDate,
    pub active: bool,
}

impl Habit {
    /// Create a new active habit starting today (local calendar date).
    pub fn new(name: impl Into<String>, category: Category, recurrence: Recurrence) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            recurrence,
            target_value: 1,
            target_unit: "times".to_string(),
            created_at: Local::now().date_naive(),
            active: true,
        }
    }

    /// Whether this habit requires action on `date`.
    ///
    /// Delegates to the recurrence rule anchored at `created_at`; always
    /// false for dates before creation. Pure and safe to call for arbitrary
    /// past or future dates.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        self.recurrence.is_due(self.created_at, date)
    }
}

/// A single completion of a habit on a calendar day.
///
/// At most one entry may exist per (habit, date) pair; the storage layer
/// rejects duplicates before they reach the reward engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub habit_id: String,
    /// Calendar day of the completion. Due-matching ignores time of day.
    pub date: NaiveDate,
    /// Amount completed, defaults to 1.
    pub value: u32,
    pub status: String,
    pub notes: Option<String>,
    /// Wall-clock instant the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl LogEntry {
    /// Create a completion entry for `habit_id` on `date`.
    pub fn new(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            habit_id: habit_id.into(),
            date,
            value: 1,
            status: "Completed".to_string(),
            notes: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trip() {
        for cat in [
            Category::Health,
            Category::Productivity,
            Category::Learning,
            Category::Mindfulness,
            Category::Other,
        ] {
            assert_eq!(Category::parse(cat.as_str()), cat);
        }
    }

    #[test]
    fn category_unknown_maps_to_other() {
        assert_eq!(Category::parse("finance"), Category::Other);
        assert_eq!(Category::parse(""), Category::Other);
    }

    #[test]
    fn habit_serialization() {
        let habit = Habit::new("Morning run", Category::Health, Recurrence::Daily);
        let json = serde_json::to_string(&habit).unwrap();
        let decoded: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.name, "Morning run");
        assert_eq!(decoded.recurrence, Recurrence::Daily);
        assert!(decoded.active);
        assert_eq!(decoded.target_value, 1);
    }

    #[test]
    fn log_entry_defaults() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let entry = LogEntry::new("h1", date);
        assert_eq!(entry.value, 1);
        assert_eq!(entry.status, "Completed");
        assert!(entry.notes.is_none());
    }
}
