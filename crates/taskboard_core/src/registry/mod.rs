//! Task registry: operations over a full task collection.
//!
//! # Responsibility
//! - Migrate loaded records into canonical tasks.
//! - Validate and apply add/toggle/remove mutations.
//!
//! # Invariants
//! - Functions hold no state between calls; callers pass a collection
//!   freshly loaded from the store.
//! - Ids stay unique and texts stay unique under case-insensitive
//!   comparison after every operation.
//! - Operations on an unknown id leave the collection unchanged.

use crate::model::task::{StoredTask, Task, TaskId};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod id;

pub use id::{unique_id, IdSource, TimestampIdSource};

/// Rejection reasons for adding a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTaskError {
    /// Input was blank after trimming.
    EmptyInput,
    /// A task with the same text (ignoring case) already exists.
    DuplicateTask(String),
}

impl Display for AddTaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "task text must not be empty"),
            Self::DuplicateTask(text) => write!(f, "task already exists: `{text}`"),
        }
    }
}

impl Error for AddTaskError {}

/// Result of migrating loaded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub tasks: Vec<Task>,
    /// Whether any record changed and should be persisted.
    pub migrated: bool,
}

/// Converts loaded records into canonical tasks.
///
/// - Records without a usable id get a freshly generated one. Numeric ids
///   are kept in their string form. A repeated id is regenerated for the
///   later record.
/// - `completed` becomes a strict boolean by truthiness.
/// - Any other fields on a record are kept as they are.
pub fn normalize(records: Vec<StoredTask>, ids: &mut impl IdSource) -> Normalized {
    let mut taken: HashSet<TaskId> = records.iter().filter_map(declared_id).collect();
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(records.len());
    let mut migrated = false;

    let tasks = records
        .into_iter()
        .map(|record| {
            let existing = declared_id(&record);
            let id_changed = record.string_id().is_none();

            let id = match existing {
                Some(id) if !seen.contains(&id) => id,
                _ => {
                    let id = unique_id(ids, |candidate| taken.contains(candidate));
                    taken.insert(id.clone());
                    migrated = true;
                    id
                }
            };
            migrated |= id_changed;
            seen.insert(id.clone());

            let completed = is_truthy(record.completed.as_ref());
            migrated |= !matches!(record.completed, Some(Value::Bool(_)));

            Task {
                id,
                text: record.text,
                completed,
                extra: record.extra,
            }
        })
        .collect();

    Normalized { tasks, migrated }
}

/// Adds a task built from `text` to `tasks`.
///
/// The text is trimmed before validation and storage. On success the new
/// task is appended and a copy is returned.
///
/// # Errors
/// - [`AddTaskError::EmptyInput`] when the trimmed text is empty.
/// - [`AddTaskError::DuplicateTask`] when a task with the same text
///   (ignoring case) exists.
pub fn add_task(
    text: &str,
    tasks: &mut Vec<Task>,
    ids: &mut impl IdSource,
) -> Result<Task, AddTaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AddTaskError::EmptyInput);
    }
    if tasks.iter().any(|task| task.has_text(text)) {
        return Err(AddTaskError::DuplicateTask(text.to_string()));
    }

    let id = unique_id(ids, |candidate| tasks.iter().any(|task| &task.id == candidate));
    let task = Task::new(id, text);
    tasks.push(task.clone());
    Ok(task)
}

/// Flips `completed` on the task with `id`.
pub fn toggle_complete(id: &TaskId, mut tasks: Vec<Task>) -> Vec<Task> {
    if let Some(task) = tasks.iter_mut().find(|task| &task.id == id) {
        task.toggle();
    }
    tasks
}

/// Returns the collection without the task with `id`.
pub fn remove_task(id: &TaskId, mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.retain(|task| &task.id != id);
    tasks
}

/// Id a record already carries, if any. Non-zero numbers map to their
/// string form; zero counts as missing.
fn declared_id(record: &StoredTask) -> Option<TaskId> {
    match &record.id {
        Some(Value::String(value)) if !value.is_empty() => Some(TaskId::new(value.as_str())),
        Some(Value::Number(value)) if is_truthy(record.id.as_ref()) => {
            Some(TaskId::new(value.to_string()))
        }
        _ => None,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
