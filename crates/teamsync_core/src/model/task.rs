//! Task model.
//!
//! # Responsibility
//! - Define the canonical task record, its creation draft and update patch.
//! - Keep the persisted status/priority spelling stable.
//!
//! # Invariants
//! - `assignee` is free text (a member display name), not a foreign key.
//! - `assignee_id`, when set, is a weak lookup-only link to a member.
//! - Status transitions are unrestricted.

use crate::model::member::MemberId;
use crate::model::validation::{normalize_label_set, require_non_empty, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable task identifier.
pub type TaskId = i64;

/// Task progress state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Parses the persisted spelling; `InProgress` is accepted as an alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Todo" => Some(Self::Todo),
            "In Progress" | "InProgress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical task record as persisted and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Display name of the assignee; matched by name on member deletion
    /// unless `assignee_id` is set.
    pub assignee: String,
    /// Optional weak link to the assigned member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<MemberId>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub description: String,
    pub tags: Vec<String>,
}

impl Task {
    /// Returns whether deleting `member` must also delete this task.
    ///
    /// Id-linked tasks follow the id; free-text tasks fall back to an exact,
    /// case-sensitive name comparison.
    pub fn is_assigned_to(&self, member_id: MemberId, member_name: &str) -> bool {
        match self.assignee_id {
            Some(linked) => linked == member_id,
            None => self.assignee == member_name,
        }
    }
}

/// Form input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub assignee_id: Option<MemberId>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub tags: Vec<String>,
}

impl TaskDraft {
    /// Creates a `Todo`/`Medium` draft assigned by free-text name.
    pub fn new(title: impl Into<String>, assignee: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            assignee: assignee.into(),
            assignee_id: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date,
            tags: Vec::new(),
        }
    }

    /// Creates a draft linked to a member id; the display name is resolved
    /// from the member at creation time.
    pub fn for_member(title: impl Into<String>, member_id: MemberId, due_date: NaiveDate) -> Self {
        let mut draft = Self::new(title, String::new(), due_date);
        draft.assignee_id = Some(member_id);
        draft
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_label_set(tags);
        self
    }

    /// Checks that `title` and `assignee` are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("assignee", &self.assignee)?;
        Ok(())
    }

    pub(crate) fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            assignee: self.assignee.trim().to_string(),
            assignee_id: self.assignee_id,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            description: self.description,
            tags: normalize_label_set(&self.tags),
        }
    }
}

/// Shallow field patch for an existing task.
///
/// `None` leaves the field unchanged. `assignee_id: Some(None)` unlinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub assignee_id: Option<Option<MemberId>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns a copy of `task` with every specified field replaced.
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut next = task.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(assignee) = &self.assignee {
            next.assignee = assignee.clone();
        }
        if let Some(assignee_id) = self.assignee_id {
            next.assignee_id = assignee_id;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(priority) = self.priority {
            next.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            next.due_date = due_date;
        }
        if let Some(tags) = &self.tags {
            next.tags = normalize_label_set(tags);
        }
        next
    }
}
