//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the task slot.
//! - Define the tolerant record shape accepted when reading legacy payloads.
//!
//! # Invariants
//! - `Task::completed` is always a strict boolean.
//! - `Task::text` is trimmed and non-empty for tasks created by core.
//! - `TaskId` values are unique within one collection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Stable identifier for one task within its collection.
///
/// Serialized as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// User-visible label.
    pub text: String,
    pub completed: bool,
    /// Fields written by other clients; carried through every save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates an active (not completed) task.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            extra: Map::new(),
        }
    }

    /// Flips completion state between active and completed.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Case-insensitive label comparison used for duplicate detection.
    pub fn has_text(&self, text: &str) -> bool {
        self.text.to_lowercase() == text.to_lowercase()
    }
}

/// Record shape accepted when reading the persisted slot.
///
/// Older payloads may lack `id` or carry non-boolean `completed` values;
/// `registry::normalize` turns these into canonical [`Task`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTask {
    #[serde(default)]
    pub id: Option<Value>,
    pub text: String,
    #[serde(default)]
    pub completed: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredTask {
    /// Returns the record id when it is already a usable non-empty string.
    pub fn string_id(&self) -> Option<&str> {
        match &self.id {
            Some(Value::String(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<Task> for StoredTask {
    fn from(task: Task) -> Self {
        Self {
            id: Some(Value::String(task.id.0)),
            text: task.text,
            completed: Some(Value::Bool(task.completed)),
            extra: task.extra,
        }
    }
}
