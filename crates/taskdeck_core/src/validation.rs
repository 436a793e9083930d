//! Task input validation.
//!
//! # Responsibility
//! - Provide pure per-field checks with typed failures.
//! - Provide `TaskValidator`, which keeps one pass/fail flag per field for
//!   form feedback.
//!
//! # Invariants
//! - Checks never read the clock; the evaluation instant is a parameter.
//! - A due date equal to `now` is valid (strict less-than rejects).

use crate::model::task::{NewTask, Task};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    MissingDueDate,
    DueDateInPast {
        due: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    DescriptionTooLong {
        chars: usize,
        max: usize,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::MissingDueDate => write!(f, "due date is required"),
            Self::DueDateInPast { due, now } => {
                write!(f, "due date {due} is earlier than {now}")
            }
            Self::DescriptionTooLong { chars, max } => {
                write!(f, "description has {chars} characters; limit is {max}")
            }
        }
    }
}

impl Error for TaskValidationError {}

pub fn check_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

pub fn check_due_date(
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), TaskValidationError> {
    match due_date {
        None => Err(TaskValidationError::MissingDueDate),
        Some(due) if due < now => Err(TaskValidationError::DueDateInPast { due, now }),
        Some(_) => Ok(()),
    }
}

pub fn check_description(description: &str) -> Result<(), TaskValidationError> {
    let chars = description.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(TaskValidationError::DescriptionTooLong {
            chars,
            max: MAX_DESCRIPTION_CHARS,
        });
    }
    Ok(())
}

/// Read access to the fields validation looks at.
pub trait TaskFields {
    fn title(&self) -> &str;
    fn due_date(&self) -> Option<DateTime<Utc>>;
    fn description(&self) -> Option<&str>;
}

impl TaskFields for Task {
    fn title(&self) -> &str {
        &self.title
    }

    fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl TaskFields for NewTask {
    fn title(&self) -> &str {
        &self.title
    }

    fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Per-field pass/fail flags, all `true` until a check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationFlags {
    pub is_valid_title: bool,
    pub is_valid_due_date: bool,
    pub is_valid_description: bool,
}

impl Default for ValidationFlags {
    fn default() -> Self {
        Self {
            is_valid_title: true,
            is_valid_due_date: true,
            is_valid_description: true,
        }
    }
}

/// Stateful validator backing a task form.
#[derive(Debug, Clone, Default)]
pub struct TaskValidator {
    flags: ValidationFlags,
}

impl TaskValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> ValidationFlags {
        self.flags
    }

    pub fn is_valid_title(&self) -> bool {
        self.flags.is_valid_title
    }

    pub fn is_valid_due_date(&self) -> bool {
        self.flags.is_valid_due_date
    }

    pub fn is_valid_description(&self) -> bool {
        self.flags.is_valid_description
    }

    pub fn validate_title(&mut self, title: &str) -> bool {
        self.flags.is_valid_title = check_title(title).is_ok();
        self.flags.is_valid_title
    }

    pub fn validate_due_date(
        &mut self,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        self.flags.is_valid_due_date = check_due_date(due_date, now).is_ok();
        self.flags.is_valid_due_date
    }

    pub fn validate_description(&mut self, description: &str) -> bool {
        self.flags.is_valid_description = check_description(description).is_ok();
        self.flags.is_valid_description
    }

    /// Runs title, due date, then description, stopping at the first
    /// failure. Flags of checks that did not run keep their old value.
    pub fn validate_task<T: TaskFields + ?Sized>(
        &mut self,
        task: &T,
        now: DateTime<Utc>,
    ) -> bool {
        self.validate_title(task.title())
            && self.validate_due_date(task.due_date(), now)
            && self.validate_description(task.description().unwrap_or_default())
    }
}
