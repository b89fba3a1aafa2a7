//! Analytics derived from a habit's recurrence and completion log.
//!
//! Everything here is a pure function over in-memory data: the caller passes
//! the habit, its log view, and an explicit `today` so day-boundary behavior
//! is pinned by the caller rather than read from the wall clock mid-query.
//! Each computation is bounded by days-since-creation.

mod completion;
mod misses;
mod streak;

pub use completion::completion_rate;
pub use misses::{missed_in_window, MissReport};
pub use streak::current_streak;

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::habit::LogEntry;

/// Distinct calendar dates present in a log view.
///
/// Streak and rate derivations count unique dates, not entries.
pub fn logged_dates(entries: &[LogEntry]) -> HashSet<NaiveDate> {
    entries.iter().map(|e| e.date).collect()
}
