//! Task domain model.
//!
//! # Responsibility
//! - Define `Task`, `User`, status/priority enums and the filter shape.
//! - Define create (`NewTask`) and partial-update (`TaskPatch`) payloads.
//!
//! # Invariants
//! - `id` and `created_at` are never touched by `TaskPatch`.
//! - Wire names are camelCase; enum values are SCREAMING_SNAKE_CASE.

use crate::model::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable task identifier (UUID v4 text for tasks created here).
///
/// Kept as plain text so collections written by other clients still load.
pub type TaskId = String;

/// Per-task status value that counts as finished work for a performer.
pub const PERFORMER_COMPLETED: &str = "completed";

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Every status in board order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Done => "DONE",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    /// Parses the exact wire value (`"DONE"`, not `"done"`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownVariant::new("task status", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or_else(|| UnknownVariant::new("task priority", value))
    }
}

/// Parse failure for status/priority wire strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: `{}`", self.kind, self.value)
    }
}

impl Error for UnknownVariant {}

/// A person that can create, perform or be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Performer progress keyed by task id (`"completed"` counts as done).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub task_status: BTreeMap<TaskId, String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            task_status: BTreeMap::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns whether this user marked the given task as completed.
    pub fn has_completed(&self, task_id: &str) -> bool {
        self.task_status
            .get(task_id)
            .is_some_and(|status| status == PERFORMER_COMPLETED)
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub creator: User,
    #[serde(default)]
    pub performers: Vec<User>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Task {
    /// Materializes a create payload with a fresh UUID v4 id.
    ///
    /// # Invariants
    /// - `created_at == updated_at == timestamp::stamp(now)`.
    pub fn from_new(data: NewTask, now: DateTime<Utc>) -> Self {
        Self::from_new_with_id(Uuid::new_v4().to_string(), data, now)
    }

    /// Materializes a create payload with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn from_new_with_id(id: impl Into<TaskId>, data: NewTask, now: DateTime<Utc>) -> Self {
        let now = timestamp::stamp(now);
        let NewTask {
            title,
            description,
            status,
            priority,
            creator,
            performers,
            due_date,
            assignee,
            tags,
        } = data;

        Self {
            id: id.into(),
            title,
            description,
            status,
            priority,
            creator,
            performers,
            created_at: now,
            updated_at: now,
            due_date,
            assignee,
            tags,
        }
    }

    /// Returns whether the task carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.iter().any(|value| value == tag))
    }
}

/// Create payload: a task without identity or timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub creator: User,
    #[serde(default)]
    pub performers: Vec<User>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NewTask {
    /// Starts a `TODO`/`MEDIUM` payload with no optional fields.
    pub fn new(title: impl Into<String>, creator: User) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            creator,
            performers: Vec::new(),
            due_date: None,
            assignee: None,
            tags: None,
        }
    }
}

/// Partial update merged over an existing task.
///
/// Outer `None` leaves a field untouched. For optional task fields the inner
/// `Option` sets (`Some(Some(v))`) or clears (`Some(None)`) the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub creator: Option<User>,
    pub performers: Option<Vec<User>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub assignee: Option<Option<User>>,
    pub tags: Option<Option<Vec<String>>>,
}

impl TaskPatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Writes every present field into `task`. Does not touch timestamps.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(creator) = self.creator {
            task.creator = creator;
        }
        if let Some(performers) = self.performers {
            task.performers = performers;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(assignee) = self.assignee {
            task.assignee = assignee;
        }
        if let Some(tags) = self.tags {
            task.tags = tags;
        }
    }
}

/// Conjunctive view filter. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskFilter {
    pub fn by_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.tags.as_deref().map_or(true, <[String]>::is_empty)
    }

    /// Applies all present predicates (AND).
    ///
    /// The tag predicate is any-of: one shared tag is enough. An empty tag
    /// list is treated as absent.
    pub fn matches(&self, task: &Task) -> bool {
        let status_match = self.status.map_or(true, |status| task.status == status);
        let priority_match = self
            .priority
            .map_or(true, |priority| task.priority == priority);
        let assignee_match = self.assignee_id.as_deref().map_or(true, |assignee_id| {
            task.assignee
                .as_ref()
                .is_some_and(|assignee| assignee.id == assignee_id)
        });
        let tags_match = match self.tags.as_deref() {
            None | Some([]) => true,
            Some(wanted) => wanted.iter().any(|tag| task.has_tag(tag)),
        };

        status_match && priority_match && assignee_match && tags_match
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus, User};
    use chrono::{TimeZone, Utc};

    fn sample_task() -> Task {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut data = NewTask::new("write report", User::new("u-1", "Ada"));
        data.tags = Some(vec!["work".to_string(), "q1".to_string()]);
        data.assignee = Some(User::new("u-2", "Grace"));
        Task::from_new(data, now)
    }

    #[test]
    fn status_round_trips_through_wire_string() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let task = sample_task();
        let mut patched = task.clone();
        let patch = TaskPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut patched);
        assert_eq!(patched, task);
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut task = sample_task();
        TaskPatch {
            assignee: Some(None),
            tags: Some(None),
            priority: Some(TaskPriority::High),
            ..TaskPatch::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.assignee, None);
        assert_eq!(task.tags, None);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn filter_with_empty_tag_list_is_empty() {
        let filter = TaskFilter {
            tags: Some(Vec::new()),
            ..TaskFilter::default()
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&sample_task()));
    }

    #[test]
    fn filter_tags_match_any_shared_tag() {
        let task = sample_task();
        let filter = TaskFilter {
            tags: Some(vec!["home".to_string(), "q1".to_string()]),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&task));

        let miss = TaskFilter {
            tags: Some(vec!["home".to_string()]),
            ..TaskFilter::default()
        };
        assert!(!miss.matches(&task));
    }

    #[test]
    fn filter_assignee_requires_an_assignee() {
        let mut task = sample_task();
        let filter = TaskFilter {
            assignee_id: Some("u-2".to_string()),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&task));

        task.assignee = None;
        assert!(!filter.matches(&task));
    }
}
