//! Display helpers over task collections.
//!
//! Pure functions; none of them read the clock or touch the store.

use crate::model::task::{Task, TaskStatus};
use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Sorts in place by ascending due date and returns the same slice.
///
/// Stable. Tasks without a due date keep their relative order and go after
/// every dated task.
pub fn sort_tasks_by_due_date(tasks: &mut [Task]) -> &mut [Task] {
    tasks.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date));
    tasks
}

fn compare_due_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn filter_tasks_by_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|task| task.status == status).collect()
}

/// Largest-unit remaining time until a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    Days(i64),
    Hours(i64),
    /// Zero or negative once the due date has passed.
    Minutes(i64),
}

impl Display for TimeRemaining {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days} days left"),
            Self::Hours(hours) => write!(f, "{hours} hours left"),
            Self::Minutes(minutes) => write!(f, "{minutes} minutes left"),
        }
    }
}

/// Splits `due - now` into floored days, then the hour remainder, then the
/// minute remainder, and keeps the first positive one (minutes otherwise).
pub fn time_remaining(due_date: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let diff_ms = (due_date - now).num_milliseconds();
    let days = diff_ms.div_euclid(DAY_MS);
    let hours = (diff_ms % DAY_MS).div_euclid(HOUR_MS);
    let minutes = (diff_ms % HOUR_MS).div_euclid(MINUTE_MS);

    if days > 0 {
        TimeRemaining::Days(days)
    } else if hours > 0 {
        TimeRemaining::Hours(hours)
    } else {
        TimeRemaining::Minutes(minutes)
    }
}

/// `time_remaining` rendered as `"N days left"` / `"N hours left"` /
/// `"N minutes left"`.
pub fn calculate_time_remaining(due_date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    time_remaining(due_date, now).to_string()
}

/// Percentage (0..=100) of performers that completed this task.
pub fn calculate_task_completion_percentage(task: &Task) -> f64 {
    if task.performers.is_empty() {
        return 0.0;
    }
    let completed = task
        .performers
        .iter()
        .filter(|performer| performer.has_completed(&task.id))
        .count();
    completed as f64 / task.performers.len() as f64 * 100.0
}

/// Calendar date as `YYYY-MM-DD` in the date's own time zone.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}
