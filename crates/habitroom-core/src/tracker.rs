//! Completion pipeline: log insert, streak transition, reward persistence.
//!
//! The core computations are pure; this module is the one place that
//! sequences them against the storage port. The sequence is retry-safe
//! rather than distributed-transactional: the duplicate check on
//! (habit, date) makes a replayed insert fail before any reward is
//! recomputed, so a crash between the log write and the progress write can
//! be repaired by retrying the whole operation at most once.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::info;

use crate::analytics::{current_streak, logged_dates};
use crate::error::{CoreError, Result};
use crate::gamification::{process_completion, CompletionEvent, CompletionReward};
use crate::habit::{Habit, LogEntry};
use crate::storage::Store;

/// Active habits due on a date, split by whether they are already logged.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DueList {
    pub pending: Vec<Habit>,
    pub completed: Vec<Habit>,
}

/// Which active habits require action on `date`, given the full log.
///
/// Archived habits never appear, regardless of their recurrence.
pub fn due_on(habits: &[Habit], log: &[LogEntry], date: NaiveDate) -> DueList {
    let done_today: HashSet<&str> = log
        .iter()
        .filter(|e| e.date == date)
        .map(|e| e.habit_id.as_str())
        .collect();

    let mut pending = Vec::new();
    let mut completed = Vec::new();
    for habit in habits.iter().filter(|h| h.active && h.is_due(date)) {
        if done_today.contains(habit.id.as_str()) {
            completed.push(habit.clone());
        } else {
            pending.push(habit.clone());
        }
    }
    DueList { pending, completed }
}

/// Orchestrates habit completion against a storage backend.
pub struct Tracker {
    store: Box<dyn Store>,
}

impl Tracker {
    pub fn new(store: Box<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn Store {
        self.store.as_mut()
    }

    /// Active habits due on `date`, split into pending and completed.
    pub fn due_on(&self, date: NaiveDate) -> Result<DueList> {
        let habits = self.store.list_habits(true)?;
        let log = self.store.logs_all()?;
        Ok(due_on(&habits, &log, date))
    }

    /// Log a completion for `habit_id` on `date` and apply rewards.
    ///
    /// `today` anchors the streak derivation; the CLI passes the local
    /// calendar date. A second completion for the same (habit, date) is
    /// rejected with [`CoreError::DuplicateCompletion`] before any reward
    /// is computed or persisted.
    pub fn complete_habit(
        &mut self,
        habit_id: &str,
        date: NaiveDate,
        value: u32,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<CompletionReward> {
        let habit = self
            .store
            .get_habit(habit_id)?
            .ok_or_else(|| CoreError::UnknownHabit(habit_id.to_string()))?;

        let entries = self.store.logs_for_habit(habit_id)?;
        let mut logged = logged_dates(&entries);
        if logged.contains(&date) {
            return Err(CoreError::DuplicateCompletion {
                habit_id: habit_id.to_string(),
                date,
            });
        }

        let streak_before = current_streak(&habit, &logged, today);

        let mut entry = LogEntry::new(habit_id, date).with_value(value);
        if let Some(notes) = notes {
            entry = entry.with_notes(notes);
        }
        self.store.insert_log(&entry)?;

        logged.insert(date);
        let streak_after = current_streak(&habit, &logged, today);

        // Counted after the insert, so the new entry is included.
        let completions_today = self.store.count_logs_on(date)?;

        let pre = self.store.progress()?;
        let reward = process_completion(
            &pre,
            &CompletionEvent {
                streak_before,
                streak_after,
                completions_today,
            },
        );
        self.store.put_progress(&reward.progress_after)?;

        info!(
            habit = %habit.name,
            %date,
            streak = streak_after,
            xp = reward.xp_earned,
            "completion recorded"
        );
        Ok(reward)
    }
}
