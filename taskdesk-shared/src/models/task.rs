//! Task model
//!
//! Tasks are owned by the [`TaskRepository`](crate::tasks::TaskRepository),
//! which keeps them in insertion order.
//!
//! # Status
//!
//! ```text
//! pending ⇄ in-progress ⇄ completed
//! ```
//!
//! Status is an unconstrained field: any status can be written through
//! [`UpdateTask`], including moving a completed task back to pending. Only
//! [`Task::mark_completed`] stamps `completed_at`.
//!
//! # Stored format
//!
//! ```json
//! {
//!   "id": 1709287200000,
//!   "titulo": "Write report",
//!   "descripcion": "Quarterly numbers",
//!   "prioridad": "alta",
//!   "estado": "pendiente",
//!   "asignado_a": "ana@example.com",
//!   "fecha_creacion": "2024-03-01T10:00:00.000Z",
//!   "fecha_vencimiento": null,
//!   "fecha_completada": null,
//!   "etiquetas": ["finance"]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::timestamp_now;

/// Task identifier (millisecond timestamp for locally created tasks)
pub type TaskId = i64;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    #[serde(rename = "alta")]
    High,

    #[serde(rename = "media")]
    Medium,

    #[serde(rename = "baja")]
    Low,
}

impl TaskPriority {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "alta",
            TaskPriority::Medium => "media",
            TaskPriority::Low => "baja",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::High => write!(f, "high"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    /// Accepts both the English names and the stored names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" | "alta" => Ok(TaskPriority::High),
            "medium" | "media" => Ok(TaskPriority::Medium),
            "low" | "baja" => Ok(TaskPriority::Low),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,

    #[serde(rename = "en-progreso")]
    InProgress,

    #[serde(rename = "completada")]
    Completed,
}

impl TaskStatus {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pendiente",
            TaskStatus::InProgress => "en-progreso",
            TaskStatus::Completed => "completada",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Accepts both the English names and the stored names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" | "pendiente" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" | "en-progreso" => Ok(TaskStatus::InProgress),
            "completed" | "completada" => Ok(TaskStatus::Completed),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// Short title
    #[serde(rename = "titulo")]
    pub title: String,

    /// Free-form description
    #[serde(rename = "descripcion")]
    pub description: String,

    /// Priority
    #[serde(rename = "prioridad")]
    pub priority: TaskPriority,

    /// Current status
    #[serde(rename = "estado", default)]
    pub status: TaskStatus,

    /// Email of the assignee (not checked against the user directory)
    #[serde(rename = "asignado_a")]
    pub assigned_to: String,

    /// When the task was created
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,

    /// Optional due date
    #[serde(rename = "fecha_vencimiento", default)]
    pub due_at: Option<DateTime<Utc>>,

    /// When the task was marked completed
    #[serde(rename = "fecha_completada", default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Tags, in insertion order without duplicates
    #[serde(rename = "etiquetas", default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Builds a task from creation input, created now
    pub fn new(id: TaskId, data: NewTask) -> Self {
        let mut task = Task {
            id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            assigned_to: data.assigned_to,
            created_at: timestamp_now(),
            due_at: data.due_at,
            completed_at: None,
            tags: Vec::with_capacity(data.tags.len()),
        };
        for tag in data.tags {
            task.add_tag(tag);
        }
        task
    }

    /// Marks the task completed and stamps the completion time
    ///
    /// Returns false (and keeps the original stamp) if the task was
    /// already completed.
    pub fn mark_completed(&mut self) -> bool {
        if self.status.is_completed() {
            return false;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(timestamp_now());
        true
    }

    /// Overwrites the status without touching `completed_at`
    pub fn change_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Appends a tag unless it is already present
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Exact, case-sensitive assignee match
    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_to == email
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,

    /// Initial status (default pending)
    #[serde(default)]
    pub status: TaskStatus,

    pub assigned_to: String,

    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
        assigned_to: impl Into<String>,
    ) -> Self {
        NewTask {
            title: title.into(),
            description: description.into(),
            priority,
            status: TaskStatus::Pending,
            assigned_to: assigned_to.into(),
            due_at: None,
            tags: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Partial update for an existing task
///
/// Only `Some` fields are written. Nullable dates use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,

    /// Replaces the whole tag list (duplicates dropped)
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    /// Whether this update would change nothing
    pub fn is_empty(&self) -> bool {
        *self == UpdateTask::default()
    }

    /// Shallow-merges the supplied fields into `task`
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.change_status(status);
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(due_at) = self.due_at {
            task.due_at = due_at;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(tags) = self.tags {
            task.tags.clear();
            for tag in tags {
                task.add_tag(tag);
            }
        }
    }
}

/// Filter criteria for listing tasks
///
/// Unset criteria match everything. `search` is a case-insensitive
/// substring match over title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Aggregate counts over a task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskStats {
    /// Counts statuses and priorities with one pass per bucket
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let with_status = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
        let with_priority = |p: TaskPriority| tasks.iter().filter(|t| t.priority == p).count();

        TaskStats {
            total: tasks.len(),
            pending: with_status(TaskStatus::Pending),
            in_progress: with_status(TaskStatus::InProgress),
            completed: with_status(TaskStatus::Completed),
            high: with_priority(TaskPriority::High),
            medium: with_priority(TaskPriority::Medium),
            low: with_priority(TaskPriority::Low),
        }
    }

    /// Share of completed tasks, 0-100 (0 for an empty collection)
    pub fn completion_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Issues task IDs from the millisecond clock
///
/// IDs are strictly increasing: when the clock has not moved past the last
/// issued (or largest known) ID, the next ID is `last + 1`. Once the largest
/// known ID is `TaskId::MAX` no further IDs can be issued.
#[derive(Debug, Clone, Default)]
pub struct TaskIdGenerator {
    last: TaskId,
}

impl TaskIdGenerator {
    /// Starts above `floor` (typically the largest ID already stored)
    pub fn starting_after(floor: TaskId) -> Self {
        TaskIdGenerator { last: floor }
    }

    /// Next ID based on the current time, `None` when IDs are exhausted
    pub fn next_id(&mut self) -> Option<TaskId> {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Next ID given a clock reading in milliseconds
    pub fn next_at(&mut self, now_millis: i64) -> Option<TaskId> {
        let id = if now_millis > self.last {
            now_millis
        } else {
            self.last.checked_add(1)?
        };
        self.last = id;
        Some(id)
    }

    /// Raises the floor so future IDs stay above `id`
    pub fn observe(&mut self, id: TaskId) {
        if id > self.last {
            self.last = id;
        }
    }
}
