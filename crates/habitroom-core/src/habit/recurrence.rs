//! Recurrence rules and due-date evaluation.
//!
//! A habit's recurrence decides, for an arbitrary calendar date, whether the
//! habit requires action that day. Evaluation is pure calendar arithmetic
//! anchored at the habit's creation date: no habit is ever due before it was
//! created.
//!
//! Recurrence definitions arrive from storage as a `(kind, value)` string
//! pair. Parsing fails closed: a missing or unparseable parameter yields
//! [`Recurrence::Never`], which is due on no date, so a broken configuration
//! cannot flood the due list.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::habit::Habit;

/// How often a habit is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecurrenceParts", into = "RecurrenceParts")]
pub enum Recurrence {
    /// Due every day.
    Daily,
    /// Due on each listed weekday. An empty list is due on no date.
    DaysOfWeek(Vec<Weekday>),
    /// Due every week on the given weekday.
    Weekly(Weekday),
    /// Due every second week on the given weekday, counting whole weeks
    /// since creation.
    Biweekly(Weekday),
    /// Due on the given day of month (1-31).
    Monthly(u32),
    /// Due on the given day of month every second month, counting months
    /// since creation.
    Bimonthly(u32),
    /// Due every `n` days since creation. The creation day is always due.
    Custom(u32),
    /// Never due. Produced when a stored recurrence is malformed.
    Never,
}

/// Wire representation: the `(kind, value)` column pair used by both storage
/// backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecurrenceParts {
    kind: String,
    #[serde(default)]
    value: Option<String>,
}

impl From<RecurrenceParts> for Recurrence {
    fn from(parts: RecurrenceParts) -> Self {
        Recurrence::from_parts(&parts.kind, parts.value.as_deref())
    }
}

impl From<Recurrence> for RecurrenceParts {
    fn from(recurrence: Recurrence) -> Self {
        let (kind, value) = recurrence.to_parts();
        RecurrenceParts {
            kind: kind.to_string(),
            value,
        }
    }
}

impl Recurrence {
    /// Parse a recurrence from its stored `(kind, value)` pair.
    ///
    /// Fails closed: an unknown kind, a missing parameter, or a parameter
    /// that does not parse all map to [`Recurrence::Never`]. Weekday tokens
    /// that fail to parse inside a `days_of_week` list are dropped; the
    /// remaining (possibly empty) list is kept.
    pub fn from_parts(kind: &str, value: Option<&str>) -> Recurrence {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        match kind {
            "daily" => Recurrence::Daily,
            "days_of_week" => match value {
                Some(v) => Recurrence::DaysOfWeek(
                    v.split(',').filter_map(|t| t.trim().parse().ok()).collect(),
                ),
                None => Recurrence::Never,
            },
            "weekly" => match value.and_then(|v| v.parse().ok()) {
                Some(day) => Recurrence::Weekly(day),
                None => Recurrence::Never,
            },
            "biweekly" => match value.and_then(|v| v.parse().ok()) {
                Some(day) => Recurrence::Biweekly(day),
                None => Recurrence::Never,
            },
            "monthly" => match parse_day_of_month(value) {
                Some(day) => Recurrence::Monthly(day),
                None => Recurrence::Never,
            },
            "bimonthly" => match parse_day_of_month(value) {
                Some(day) => Recurrence::Bimonthly(day),
                None => Recurrence::Never,
            },
            "custom" => match value.and_then(|v| v.parse::<u32>().ok()) {
                Some(interval) => Recurrence::Custom(interval.max(1)),
                None => Recurrence::Never,
            },
            _ => Recurrence::Never,
        }
    }

    /// The stored `(kind, value)` pair for this recurrence.
    pub fn to_parts(&self) -> (&'static str, Option<String>) {
        match self {
            Recurrence::Daily => ("daily", None),
            Recurrence::DaysOfWeek(days) => (
                "days_of_week",
                Some(
                    days.iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(","),
                ),
            ),
            Recurrence::Weekly(day) => ("weekly", Some(day.to_string())),
            Recurrence::Biweekly(day) => ("biweekly", Some(day.to_string())),
            Recurrence::Monthly(day) => ("monthly", Some(day.to_string())),
            Recurrence::Bimonthly(day) => ("bimonthly", Some(day.to_string())),
            Recurrence::Custom(interval) => ("custom", Some(interval.to_string())),
            Recurrence::Never => ("never", None),
        }
    }

    /// Whether a habit created on `created_at` with this recurrence is due
    /// on `date`.
    ///
    /// Always false for `date < created_at`. Pure and total over all dates.
    pub fn is_due(&self, created_at: NaiveDate, date: NaiveDate) -> bool {
        if date < created_at {
            return false;
        }
        match self {
            Recurrence::Daily => true,
            Recurrence::DaysOfWeek(days) => days.contains(&date.weekday()),
            Recurrence::Weekly(day) => date.weekday() == *day,
            Recurrence::Biweekly(day) => {
                date.weekday() == *day && ((date - created_at).num_days() / 7) % 2 == 0
            }
            Recurrence::Monthly(day) => date.day() == *day,
            Recurrence::Bimonthly(day) => {
                date.day() == *day && months_between(created_at, date) % 2 == 0
            }
            Recurrence::Custom(interval) => {
                (date - created_at).num_days() % i64::from((*interval).max(1)) == 0
            }
            Recurrence::Never => false,
        }
    }
}

fn parse_day_of_month(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|d| (1..=31).contains(d))
}

/// Whole calendar months between `earlier` and `later`.
fn months_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    let earlier_months = i64::from(earlier.year()) * 12 + i64::from(earlier.month());
    let later_months = i64::from(later.year()) * 12 + i64::from(later.month());
    later_months - earlier_months
}

/// Lazy iterator over a habit's due dates within an inclusive date range.
///
/// Yields dates in ascending order, bounded by `to`. Restartable by calling
/// [`due_dates`] again; correctness does not depend on any memoization.
pub struct DueDates<'a> {
    habit: &'a Habit,
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DueDates<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(date) = self.cursor {
            if date > self.end {
                return None;
            }
            self.cursor = date.succ_opt();
            if self.habit.is_due(date) {
                return Some(date);
            }
        }
        None
    }
}

/// Enumerate the dates in `[from, to]` on which `habit` is due.
///
/// The walk starts at the habit's creation date if that is later than
/// `from`; dates before creation are never due.
pub fn due_dates(habit: &Habit, from: NaiveDate, to: NaiveDate) -> DueDates<'_> {
    DueDates {
        habit,
        cursor: Some(from.max(habit.created_at)),
        end: to,
    }
}
