//! JSON document storage.
//!
//! The document-store counterpart of the SQLite backend: one JSON file
//! holding every collection, rewritten atomically (temp file + rename) on
//! each mutation. Suits small single-user datasets where a full rewrite per
//! write is cheap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use super::{data_dir, Store};
use crate::agenda::{Project, Reminder};
use crate::error::{CoreError, Result};
use crate::gamification::UserProgress;
use crate::habit::{Habit, LogEntry};

/// The whole persisted document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    habits: Vec<Habit>,
    #[serde(default)]
    logs: Vec<LogEntry>,
    #[serde(default)]
    reminders: Vec<Reminder>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    progress: UserProgress,
}

/// JSON file storage backend.
pub struct JsonStore {
    path: PathBuf,
    doc: Document,
}

impl JsonStore {
    /// Open the document at `~/.config/habitroom/habitroom.json`.
    ///
    /// A missing file starts an empty document; it is created on the first
    /// write.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("habitroom.json"))
    }

    /// Open a document at an explicit path.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(CoreError::Io(e)),
        };
        Ok(Self { path, doc })
    }

    /// Persist the document: write a temp file, then rename over the target.
    fn save(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.doc)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "document saved");
        Ok(())
    }
}

impl Store for JsonStore {
    fn add_habit(&mut self, habit: &Habit) -> Result<()> {
        self.doc.habits.push(habit.clone());
        self.save()
    }

    fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        Ok(self.doc.habits.iter().find(|h| h.id == id).cloned())
    }

    fn list_habits(&self, active_only: bool) -> Result<Vec<Habit>> {
        let mut habits: Vec<Habit> = self
            .doc
            .habits
            .iter()
            .filter(|h| !active_only || h.active)
            .cloned()
            .collect();
        habits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(habits)
    }

    fn update_habit(&mut self, habit: &Habit) -> Result<()> {
        if let Some(existing) = self.doc.habits.iter_mut().find(|h| h.id == habit.id) {
            existing.name = habit.name.clone();
            existing.category = habit.category;
            existing.recurrence = habit.recurrence.clone();
            existing.target_value = habit.target_value;
            existing.target_unit = habit.target_unit.clone();
            // created_at and active are deliberately left alone.
            self.save()?;
        }
        Ok(())
    }

    fn archive_habit(&mut self, id: &str) -> Result<()> {
        if let Some(habit) = self.doc.habits.iter_mut().find(|h| h.id == id) {
            habit.active = false;
            self.save()?;
        }
        Ok(())
    }

    fn insert_log(&mut self, entry: &LogEntry) -> Result<()> {
        let duplicate = self
            .doc
            .logs
            .iter()
            .any(|e| e.habit_id == entry.habit_id && e.date == entry.date);
        if duplicate {
            return Err(CoreError::DuplicateCompletion {
                habit_id: entry.habit_id.clone(),
                date: entry.date,
            });
        }
        self.doc.logs.push(entry.clone());
        self.save()
    }

    fn logs_for_habit(&self, habit_id: &str) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = self
            .doc
            .logs
            .iter()
            .filter(|e| e.habit_id == habit_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    fn logs_all(&self) -> Result<Vec<LogEntry>> {
        let mut entries = self.doc.logs.clone();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    fn count_logs_on(&self, date: NaiveDate) -> Result<u64> {
        Ok(self.doc.logs.iter().filter(|e| e.date == date).count() as u64)
    }

    fn add_reminder(&mut self, reminder: &Reminder) -> Result<()> {
        self.doc.reminders.push(reminder.clone());
        self.save()
    }

    fn list_reminders(&self, pending_only: bool) -> Result<Vec<Reminder>> {
        let mut reminders: Vec<Reminder> = self
            .doc
            .reminders
            .iter()
            .filter(|r| !pending_only || !r.completed)
            .cloned()
            .collect();
        reminders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reminders)
    }

    fn set_reminder_completed(&mut self, id: &str, completed: bool) -> Result<()> {
        if let Some(reminder) = self.doc.reminders.iter_mut().find(|r| r.id == id) {
            reminder.completed = completed;
            self.save()?;
        }
        Ok(())
    }

    fn delete_reminder(&mut self, id: &str) -> Result<()> {
        let before = self.doc.reminders.len();
        self.doc.reminders.retain(|r| r.id != id);
        if self.doc.reminders.len() != before {
            self.save()?;
        }
        Ok(())
    }

    fn add_project(&mut self, project: &Project) -> Result<()> {
        self.doc.projects.push(project.clone());
        self.save()
    }

    fn list_projects(&self, pending_only: bool) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .doc
            .projects
            .iter()
            .filter(|p| !pending_only || !p.completed)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    fn set_project_completed(&mut self, id: &str, completed: bool) -> Result<()> {
        if let Some(project) = self.doc.projects.iter_mut().find(|p| p.id == id) {
            project.completed = completed;
            self.save()?;
        }
        Ok(())
    }

    fn delete_project(&mut self, id: &str) -> Result<()> {
        let before = self.doc.projects.len();
        self.doc.projects.retain(|p| p.id != id);
        if self.doc.projects.len() != before {
            self.save()?;
        }
        Ok(())
    }

    fn progress(&self) -> Result<UserProgress> {
        Ok(self.doc.progress.clone())
    }

    fn put_progress(&mut self, progress: &UserProgress) -> Result<()> {
        self.doc.progress = progress.clone();
        self.save()
    }
}

#[cfg(test)]
impl JsonStore {
    fn reopen(&self) -> JsonStore {
        JsonStore::open_at(&self.path).unwrap()
    }

    fn open_temp(dir: &std::path::Path) -> JsonStore {
        JsonStore::open_at(dir.join("habitroom.json")).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Category, Recurrence};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn habits_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open_temp(dir.path());

        let mut habit = Habit::new("hydrate", Category::Health, Recurrence::Custom(3));
        habit.created_at = date(2024, 1, 1);
        store.add_habit(&habit).unwrap();

        let reopened = store.reopen();
        let loaded = reopened.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "hydrate");
        assert_eq!(loaded.recurrence, Recurrence::Custom(3));
        assert_eq!(loaded.created_at, date(2024, 1, 1));
    }

    #[test]
    fn malformed_recurrence_in_document_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitroom.json");
        std::fs::write(
            &path,
            r#"{
                "habits": [{
                    "id": "h1",
                    "name": "broken",
                    "category": "health",
                    "recurrence": {"kind": "weekly", "value": "Noday"},
                    "target_value": 1,
                    "target_unit": "times",
                    "created_at": "2024-01-01",
                    "active": true
                }]
            }"#,
        )
        .unwrap();

        let store = JsonStore::open_at(&path).unwrap();
        let habit = store.get_habit("h1").unwrap().unwrap();
        assert_eq!(habit.recurrence, Recurrence::Never);
    }

    #[test]
    fn duplicate_log_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open_temp(dir.path());

        let habit = Habit::new("hydrate", Category::Health, Recurrence::Daily);
        store.add_habit(&habit).unwrap();

        store
            .insert_log(&LogEntry::new(habit.id.clone(), date(2024, 1, 1)))
            .unwrap();
        let err = store
            .insert_log(&LogEntry::new(habit.id.clone(), date(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCompletion { .. }));
    }

    #[test]
    fn progress_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open_temp(dir.path());

        let progress = UserProgress {
            total_xp: 230,
            unlocked_badges: vec!["first_step".to_string()],
        };
        store.put_progress(&progress).unwrap();

        assert_eq!(store.reopen().progress().unwrap(), progress);
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_temp(dir.path());
        assert!(store.list_habits(false).unwrap().is_empty());
        assert_eq!(store.progress().unwrap(), UserProgress::default());
    }

    #[test]
    fn archive_is_soft_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open_temp(dir.path());

        let habit = Habit::new("hydrate", Category::Health, Recurrence::Daily);
        store.add_habit(&habit).unwrap();
        store.archive_habit(&habit.id).unwrap();

        assert!(store.list_habits(true).unwrap().is_empty());
        assert_eq!(store.list_habits(false).unwrap().len(), 1);
    }
}
