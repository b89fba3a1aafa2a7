//! SQLite-backed storage.
//!
//! Stores habits, completion logs, reminders, projects, and the user
//! progress singleton. Calendar dates are stored as `YYYY-MM-DD` text and
//! instants as RFC 3339 text.

use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{data_dir, migrations, Store};
use crate::agenda::{Priority, Project, Reminder};
use crate::error::{CoreError, DatabaseError, Result};
use crate::gamification::UserProgress;
use crate::habit::{Category, Habit, LogEntry, Recurrence};

// === Helper Functions ===

/// Parse a calendar date from database text, falling back to today.
fn parse_date_fallback(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Local::now().date_naive())
}

/// Parse an instant from RFC 3339 text, falling back to now.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Build a Habit from a database row.
///
/// Row order: id, name, category, recurrence_kind, recurrence_value,
/// target_value, target_unit, created_at, is_active.
fn row_to_habit(row: &rusqlite::Row) -> std::result::Result<Habit, rusqlite::Error> {
    let category_str: String = row.get(2)?;
    let kind: String = row.get(3)?;
    let value: Option<String> = row.get(4)?;
    let created_at_str: String = row.get(7)?;

    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        category: Category::parse(&category_str),
        recurrence: Recurrence::from_parts(&kind, value.as_deref()),
        target_value: row.get(5)?,
        target_unit: row.get(6)?,
        created_at: parse_date_fallback(&created_at_str),
        active: row.get(8)?,
    })
}

/// Build a LogEntry from a database row.
///
/// Row order: id, habit_id, date, value, status, notes, recorded_at.
fn row_to_log(row: &rusqlite::Row) -> std::result::Result<LogEntry, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let recorded_at_str: String = row.get(6)?;

    Ok(LogEntry {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: parse_date_fallback(&date_str),
        value: row.get(3)?,
        status: row.get(4)?,
        notes: row.get(5)?,
        recorded_at: parse_datetime_fallback(&recorded_at_str),
    })
}

/// Build a Reminder from a database row.
fn row_to_reminder(row: &rusqlite::Row) -> std::result::Result<Reminder, rusqlite::Error> {
    let priority_str: String = row.get(2)?;
    let created_at_str: String = row.get(3)?;

    Ok(Reminder {
        id: row.get(0)?,
        text: row.get(1)?,
        priority: Priority::parse(&priority_str),
        created_at: parse_datetime_fallback(&created_at_str),
        completed: row.get(4)?,
    })
}

/// Build a Project from a database row.
fn row_to_project(row: &rusqlite::Row) -> std::result::Result<Project, rusqlite::Error> {
    let priority_str: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;

    Ok(Project {
        id: row.get(0)?,
        text: row.get(1)?,
        description: row.get(2)?,
        priority: Priority::parse(&priority_str),
        created_at: parse_datetime_fallback(&created_at_str),
        completed: row.get(5)?,
    })
}

/// SQLite storage backend.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `~/.config/habitroom/habitroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("habitroom.db");
        let conn = Connection::open(&path).map_err(|source| {
            CoreError::Database(DatabaseError::OpenFailed { path, source })
        })?;
        migrations::migrate(&conn)
            .map_err(|e| CoreError::Database(DatabaseError::MigrationFailed(e.to_string())))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::migrate(&conn)
            .map_err(|e| CoreError::Database(DatabaseError::MigrationFailed(e.to_string())))?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn add_habit(&mut self, habit: &Habit) -> Result<()> {
        let (kind, value) = habit.recurrence.to_parts();
        self.conn.execute(
            "INSERT INTO habits (id, name, category, recurrence_kind, recurrence_value,
                                 target_value, target_unit, created_at, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                habit.id,
                habit.name,
                habit.category.as_str(),
                kind,
                value,
                habit.target_value,
                habit.target_unit,
                format_date(habit.created_at),
                habit.active,
            ],
        )?;
        debug!(habit = %habit.name, "habit added");
        Ok(())
    }

    fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let habit = self
            .conn
            .query_row(
                "SELECT id, name, category, recurrence_kind, recurrence_value,
                        target_value, target_unit, created_at, is_active
                 FROM habits WHERE id = ?1",
                params![id],
                row_to_habit,
            )
            .optional()?;
        Ok(habit)
    }

    fn list_habits(&self, active_only: bool) -> Result<Vec<Habit>> {
        let sql = if active_only {
            "SELECT id, name, category, recurrence_kind, recurrence_value,
                    target_value, target_unit, created_at, is_active
             FROM habits WHERE is_active = 1 ORDER BY created_at DESC"
        } else {
            "SELECT id, name, category, recurrence_kind, recurrence_value,
                    target_value, target_unit, created_at, is_active
             FROM habits ORDER BY created_at DESC"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let habits = stmt
            .query_map([], row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn update_habit(&mut self, habit: &Habit) -> Result<()> {
        let (kind, value) = habit.recurrence.to_parts();
        self.conn.execute(
            "UPDATE habits
             SET name = ?2, category = ?3, recurrence_kind = ?4, recurrence_value = ?5,
                 target_value = ?6, target_unit = ?7
             WHERE id = ?1",
            params![
                habit.id,
                habit.name,
                habit.category.as_str(),
                kind,
                value,
                habit.target_value,
                habit.target_unit,
            ],
        )?;
        Ok(())
    }

    fn archive_habit(&mut self, id: &str) -> Result<()> {
        self.conn
            .execute("UPDATE habits SET is_active = 0 WHERE id = ?1", params![id])?;
        debug!(habit_id = id, "habit archived");
        Ok(())
    }

    fn insert_log(&mut self, entry: &LogEntry) -> Result<()> {
        let date_str = format_date(entry.date);
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM logs WHERE habit_id = ?1 AND date = ?2",
                params![entry.habit_id, date_str],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(CoreError::DuplicateCompletion {
                habit_id: entry.habit_id.clone(),
                date: entry.date,
            });
        }

        let insert = self.conn.execute(
            "INSERT INTO logs (id, habit_id, date, value, status, notes, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.habit_id,
                date_str,
                entry.value,
                entry.status,
                entry.notes,
                entry.recorded_at.to_rfc3339(),
            ],
        );
        match insert {
            Ok(_) => {
                debug!(habit_id = %entry.habit_id, date = %entry.date, "completion logged");
                Ok(())
            }
            // The unique index backstops the check above.
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(CoreError::DuplicateCompletion {
                    habit_id: entry.habit_id.clone(),
                    date: entry.date,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn logs_for_habit(&self, habit_id: &str) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, value, status, notes, recorded_at
             FROM logs WHERE habit_id = ?1 ORDER BY date DESC",
        )?;
        let entries = stmt
            .query_map(params![habit_id], row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn logs_all(&self) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, value, status, notes, recorded_at
             FROM logs ORDER BY date DESC",
        )?;
        let entries = stmt
            .query_map([], row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn count_logs_on(&self, date: NaiveDate) -> Result<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM logs WHERE date = ?1",
            params![format_date(date)],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn add_reminder(&mut self, reminder: &Reminder) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminders (id, text, priority, created_at, is_completed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                reminder.id,
                reminder.text,
                reminder.priority.as_str(),
                reminder.created_at.to_rfc3339(),
                reminder.completed,
            ],
        )?;
        Ok(())
    }

    fn list_reminders(&self, pending_only: bool) -> Result<Vec<Reminder>> {
        let sql = if pending_only {
            "SELECT id, text, priority, created_at, is_completed
             FROM reminders WHERE is_completed = 0 ORDER BY created_at DESC"
        } else {
            "SELECT id, text, priority, created_at, is_completed
             FROM reminders ORDER BY created_at DESC"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let reminders = stmt
            .query_map([], row_to_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    fn set_reminder_completed(&mut self, id: &str, completed: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE reminders SET is_completed = ?2 WHERE id = ?1",
            params![id, completed],
        )?;
        Ok(())
    }

    fn delete_reminder(&mut self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM reminders WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn add_project(&mut self, project: &Project) -> Result<()> {
        self.conn.execute(
            "INSERT INTO projects (id, text, description, priority, created_at, is_completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                project.id,
                project.text,
                project.description,
                project.priority.as_str(),
                project.created_at.to_rfc3339(),
                project.completed,
            ],
        )?;
        Ok(())
    }

    fn list_projects(&self, pending_only: bool) -> Result<Vec<Project>> {
        let sql = if pending_only {
            "SELECT id, text, description, priority, created_at, is_completed
             FROM projects WHERE is_completed = 0 ORDER BY created_at DESC"
        } else {
            "SELECT id, text, description, priority, created_at, is_completed
             FROM projects ORDER BY created_at DESC"
        };
        let mut stmt = self.conn.prepare(sql)?;
        let projects = stmt
            .query_map([], row_to_project)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    fn set_project_completed(&mut self, id: &str, completed: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE projects SET is_completed = ?2 WHERE id = ?1",
            params![id, completed],
        )?;
        Ok(())
    }

    fn delete_project(&mut self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn progress(&self) -> Result<UserProgress> {
        let row = self
            .conn
            .query_row(
                "SELECT total_xp, unlocked_badges FROM user_progress WHERE id = 1",
                [],
                |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                },
            )
            .optional()?;
        match row {
            Some((total_xp, badges_json)) => Ok(UserProgress {
                total_xp: total_xp.max(0) as u64,
                unlocked_badges: serde_json::from_str(&badges_json).unwrap_or_default(),
            }),
            None => Ok(UserProgress::default()),
        }
    }

    fn put_progress(&mut self, progress: &UserProgress) -> Result<()> {
        let badges_json = serde_json::to_string(&progress.unlocked_badges)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO user_progress (id, total_xp, unlocked_badges)
             VALUES (1, ?1, ?2)",
            params![progress.total_xp as i64, badges_json],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_habit(name: &str) -> Habit {
        let mut habit = Habit::new(name, Category::Health, Recurrence::Custom(3));
        habit.created_at = date(2024, 1, 1);
        habit
    }

    #[test]
    fn habit_round_trip() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = sample_habit("hydrate");
        store.add_habit(&habit).unwrap();

        let loaded = store.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "hydrate");
        assert_eq!(loaded.category, Category::Health);
        assert_eq!(loaded.recurrence, Recurrence::Custom(3));
        assert_eq!(loaded.created_at, date(2024, 1, 1));
        assert!(loaded.active);
    }

    #[test]
    fn update_preserves_creation_date() {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut habit = sample_habit("hydrate");
        store.add_habit(&habit).unwrap();

        habit.name = "hydrate more".to_string();
        habit.created_at = date(2030, 12, 31); // must not be written
        store.update_habit(&habit).unwrap();

        let loaded = store.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "hydrate more");
        assert_eq!(loaded.created_at, date(2024, 1, 1));
    }

    #[test]
    fn archive_excludes_from_active_listing() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = sample_habit("hydrate");
        store.add_habit(&habit).unwrap();
        store.archive_habit(&habit.id).unwrap();

        assert!(store.list_habits(true).unwrap().is_empty());
        assert_eq!(store.list_habits(false).unwrap().len(), 1);
    }

    #[test]
    fn malformed_recurrence_loads_as_never() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = sample_habit("broken");
        store.add_habit(&habit).unwrap();
        store
            .conn
            .execute(
                "UPDATE habits SET recurrence_kind = 'weekly', recurrence_value = NULL",
                [],
            )
            .unwrap();

        let loaded = store.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.recurrence, Recurrence::Never);
        assert!(!loaded.is_due(date(2024, 6, 1)));
    }

    #[test]
    fn duplicate_log_rejected() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = sample_habit("hydrate");
        store.add_habit(&habit).unwrap();

        let entry = LogEntry::new(habit.id.clone(), date(2024, 1, 1));
        store.insert_log(&entry).unwrap();

        let dup = LogEntry::new(habit.id.clone(), date(2024, 1, 1));
        let err = store.insert_log(&dup).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateCompletion { .. }));
        assert_eq!(store.logs_for_habit(&habit.id).unwrap().len(), 1);
    }

    #[test]
    fn count_logs_on_counts_across_habits() {
        let mut store = SqliteStore::open_memory().unwrap();
        let a = sample_habit("a");
        let b = sample_habit("b");
        store.add_habit(&a).unwrap();
        store.add_habit(&b).unwrap();

        let day = date(2024, 1, 1);
        store.insert_log(&LogEntry::new(a.id.clone(), day)).unwrap();
        store.insert_log(&LogEntry::new(b.id.clone(), day)).unwrap();
        store
            .insert_log(&LogEntry::new(a.id.clone(), date(2024, 1, 2)))
            .unwrap();

        assert_eq!(store.count_logs_on(day).unwrap(), 2);
        assert_eq!(store.count_logs_on(date(2024, 1, 3)).unwrap(), 0);
    }

    #[test]
    fn reminder_lifecycle() {
        let mut store = SqliteStore::open_memory().unwrap();
        let reminder = Reminder::new("call mom", Priority::High);
        store.add_reminder(&reminder).unwrap();

        assert_eq!(store.list_reminders(true).unwrap().len(), 1);
        store.set_reminder_completed(&reminder.id, true).unwrap();
        assert!(store.list_reminders(true).unwrap().is_empty());
        assert_eq!(store.list_reminders(false).unwrap().len(), 1);

        store.delete_reminder(&reminder.id).unwrap();
        assert!(store.list_reminders(false).unwrap().is_empty());
    }

    #[test]
    fn project_lifecycle() {
        let mut store = SqliteStore::open_memory().unwrap();
        let project = Project::new("ship v1", Some("first release".into()), Priority::Medium);
        store.add_project(&project).unwrap();

        let listed = store.list_projects(true).unwrap();
        assert_eq!(listed[0].description.as_deref(), Some("first release"));

        store.set_project_completed(&project.id, true).unwrap();
        assert!(store.list_projects(true).unwrap().is_empty());
        store.delete_project(&project.id).unwrap();
        assert!(store.list_projects(false).unwrap().is_empty());
    }

    #[test]
    fn progress_round_trip() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert_eq!(store.progress().unwrap(), UserProgress::default());

        let progress = UserProgress {
            total_xp: 160,
            unlocked_badges: vec!["first_step".to_string(), "week_warrior".to_string()],
        };
        store.put_progress(&progress).unwrap();
        assert_eq!(store.progress().unwrap(), progress);
    }
}
