//! Lifetime completion-rate derivation.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::habit::{due_dates, Habit};

/// Fraction of lifetime due dates with a matching completion.
///
/// Counts every due date from `created_at` through `today` inclusive against
/// the distinct logged dates. Returns `(percentage in [0, 100], total_due)`;
/// a habit with no due dates yet (or a creation date in the future) yields
/// `(0.0, 0)`. The percentage is capped at 100.
pub fn completion_rate(
    habit: &Habit,
    logged: &HashSet<NaiveDate>,
    today: NaiveDate,
) -> (f64, u64) {
    if habit.created_at > today {
        return (0.0, 0);
    }

    let total_due = due_dates(habit, habit.created_at, today).count() as u64;
    if total_due == 0 {
        return (0.0, 0);
    }

    let completed = logged.len() as u64;
    let rate = (completed as f64 / total_due as f64 * 100.0).min(100.0);
    (rate, total_due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Category, Recurrence};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seven_of_ten_is_seventy_percent() {
        let mut habit = Habit::new("test", Category::Other, Recurrence::Daily);
        habit.created_at = date(2024, 1, 1);
        // 10 due days (01-01..01-10), 7 unique completions.
        let logged: HashSet<NaiveDate> = (1..=7).map(|d| date(2024, 1, d)).collect();
        let (rate, total_due) = completion_rate(&habit, &logged, date(2024, 1, 10));
        assert_eq!(total_due, 10);
        assert!((rate - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_due_dates_is_zero() {
        let mut habit = Habit::new("test", Category::Other, Recurrence::Never);
        habit.created_at = date(2024, 1, 1);
        assert_eq!(completion_rate(&habit, &HashSet::new(), date(2024, 2, 1)), (0.0, 0));
    }

    #[test]
    fn future_creation_is_zero() {
        let mut habit = Habit::new("test", Category::Other, Recurrence::Daily);
        habit.created_at = date(2024, 3, 1);
        assert_eq!(completion_rate(&habit, &HashSet::new(), date(2024, 2, 1)), (0.0, 0));
    }

    #[test]
    fn rate_caps_at_one_hundred() {
        // Completions on non-due dates can push the raw ratio over 1.
        let mut habit = Habit::new("test", Category::Other, Recurrence::Custom(3));
        habit.created_at = date(2024, 1, 1);
        let logged: HashSet<NaiveDate> = (1..=6).map(|d| date(2024, 1, d)).collect();
        let (rate, total_due) = completion_rate(&habit, &logged, date(2024, 1, 6));
        assert_eq!(total_due, 2); // 01-01 and 01-04
        assert!((rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn full_completion() {
        let mut habit = Habit::new("test", Category::Other, Recurrence::Daily);
        habit.created_at = date(2024, 1, 1);
        let logged: HashSet<NaiveDate> = (1..=5).map(|d| date(2024, 1, d)).collect();
        let (rate, total_due) = completion_rate(&habit, &logged, date(2024, 1, 5));
        assert_eq!(total_due, 5);
        assert!((rate - 100.0).abs() < f64::EPSILON);
    }
}
