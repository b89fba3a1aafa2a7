//! Current-streak derivation.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::habit::{due_dates, Habit};

/// Count of consecutive due dates, most recent first, with a matching
/// completion.
///
/// Walks the habit's due dates from `created_at` through `today` inclusive
/// in descending order. A logged due date extends the streak; an unlogged
/// one ends it, unless that date is exactly `today` — the current day's
/// completion window has not closed, so an unfinished today is skipped
/// rather than treated as a break.
///
/// Returns 0 for an empty log, a creation date in the future, or a range
/// with no due dates at all.
pub fn current_streak(habit: &Habit, logged: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    if logged.is_empty() || habit.created_at > today {
        return 0;
    }

    let due: Vec<NaiveDate> = due_dates(habit, habit.created_at, today).collect();

    let mut streak = 0;
    for date in due.into_iter().rev() {
        if logged.contains(&date) {
            streak += 1;
        } else if date == today {
            continue;
        } else {
            break;
        }
    }
    streak
}
