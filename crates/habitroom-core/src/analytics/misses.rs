//! Windowed missed-day aggregation across habits.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

use crate::habit::{due_dates, Habit, LogEntry};

/// Missed due dates for one habit within the analysis window.
#[derive(Debug, Clone, Serialize)]
pub struct MissReport {
    pub habit_id: String,
    pub habit_name: String,
    pub missed_count: u64,
    pub total_due: u64,
    /// Fraction of in-window due dates that were missed, in [0, 1].
    pub miss_rate: f64,
}

/// Missed due dates per active habit over the trailing `window_days` days.
///
/// For each habit the due-date walk covers
/// `[max(today - window_days, created_at), today)` — today itself is
/// excluded, since an unfinished current day cannot yet be "missed". Habits
/// with zero misses are omitted. The result is sorted descending by
/// `missed_count`, with habit name as tie-break for stable output.
pub fn missed_in_window(
    habits: &[Habit],
    log: &[LogEntry],
    window_days: u32,
    today: NaiveDate,
) -> Vec<MissReport> {
    let window_start = today - Duration::days(i64::from(window_days));

    let mut reports: Vec<MissReport> = habits
        .iter()
        .filter(|h| h.active)
        .filter_map(|habit| {
            let logged: HashSet<NaiveDate> = log
                .iter()
                .filter(|e| e.habit_id == habit.id)
                .map(|e| e.date)
                .collect();

            let from = window_start.max(habit.created_at);
            let mut total_due = 0u64;
            let mut missed_count = 0u64;
            for date in due_dates(habit, from, today) {
                if date >= today {
                    break;
                }
                total_due += 1;
                if !logged.contains(&date) {
                    missed_count += 1;
                }
            }

            if missed_count == 0 {
                return None;
            }
            Some(MissReport {
                habit_id: habit.id.clone(),
                habit_name: habit.name.clone(),
                missed_count,
                total_due,
                miss_rate: missed_count as f64 / total_due as f64,
            })
        })
        .collect();

    reports.sort_by(|a, b| {
        b.missed_count
            .cmp(&a.missed_count)
            .then_with(|| a.habit_name.cmp(&b.habit_name))
    });
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Category, Recurrence};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_habit(name: &str, created_at: NaiveDate) -> Habit {
        let mut habit = Habit::new(name, Category::Other, Recurrence::Daily);
        habit.created_at = created_at;
        habit
    }

    fn entry(habit: &Habit, date: NaiveDate) -> LogEntry {
        LogEntry::new(habit.id.clone(), date)
    }

    #[test]
    fn today_is_never_counted_as_missed() {
        let habit = daily_habit("water", date(2024, 1, 1));
        let today = date(2024, 1, 3);
        // 01-01 and 01-02 logged; 01-03 (today) is not, and must not count.
        let log = vec![entry(&habit, date(2024, 1, 1)), entry(&habit, date(2024, 1, 2))];
        let reports = missed_in_window(&[habit], &log, 30, today);
        assert!(reports.is_empty());
    }

    #[test]
    fn counts_misses_inside_window_only() {
        let habit = daily_habit("water", date(2024, 1, 1));
        // Window of 3 days before 2024-02-01 covers 01-29..01-31.
        let log = vec![entry(&habit, date(2024, 1, 30))];
        let reports = missed_in_window(&[habit], &log, 3, date(2024, 2, 1));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].missed_count, 2);
        assert_eq!(reports[0].total_due, 3);
        assert!((reports[0].miss_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn window_clamps_to_creation_date() {
        let habit = daily_habit("new", date(2024, 1, 30));
        let reports = missed_in_window(&[habit], &[], 30, date(2024, 2, 1));
        // Only 01-30 and 01-31 can be missed.
        assert_eq!(reports[0].missed_count, 2);
        assert_eq!(reports[0].total_due, 2);
    }

    #[test]
    fn inactive_habits_are_excluded() {
        let mut habit = daily_habit("archived", date(2024, 1, 1));
        habit.active = false;
        let reports = missed_in_window(&[habit], &[], 30, date(2024, 2, 1));
        assert!(reports.is_empty());
    }

    #[test]
    fn sorted_descending_by_missed_count() {
        let bad = daily_habit("bad", date(2024, 1, 1));
        let mut worse = Habit::new("worse", Category::Other, Recurrence::Daily);
        worse.created_at = date(2024, 1, 1);
        let log: Vec<LogEntry> = (25..=29).map(|d| entry(&bad, date(2024, 1, d))).collect();
        let reports = missed_in_window(&[bad, worse], &log, 7, date(2024, 2, 1));
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].habit_name, "worse");
        assert!(reports[0].missed_count > reports[1].missed_count);
    }
}
