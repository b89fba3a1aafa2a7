//! Reminders and projects: one-off agenda items alongside recurring habits.
//!
//! These carry no recurrence and earn no rewards; completing one just flips
//! its flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority of an agenda item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse from a stored string; unknown strings map to Medium.
    pub fn parse(s: &str) -> Priority {
        match s.to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

/// A sticky one-off reminder ("Call Mom", "Pay bills").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub text: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl Reminder {
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            priority,
            created_at: Utc::now(),
            completed: false,
        }
    }
}

/// A larger tracked goal with an optional description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub text: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl Project {
    pub fn new(
        text: impl Into<String>,
        description: Option<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            description,
            priority,
            created_at: Utc::now(),
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_round_trip() {
        for p in [Priority::High, Priority::Medium, Priority::Low] {
            assert_eq!(Priority::parse(p.as_str()), p);
        }
    }

    #[test]
    fn priority_unknown_maps_to_medium() {
        assert_eq!(Priority::parse("urgent"), Priority::Medium);
    }

    #[test]
    fn new_items_start_pending() {
        assert!(!Reminder::new("call mom", Priority::High).completed);
        assert!(!Project::new("ship v1", None, Priority::Medium).completed);
    }
}
