//! Task use-case service.
//!
//! # Responsibility
//! - Run each use-case as load -> normalize -> mutate -> save.
//! - Reload the collection from the store after toggle/delete writes and
//!   hand that reloaded collection to callers.
//!
//! # Invariants
//! - No task state is cached between calls; the store is the only owner of
//!   the collection.
//! - Migrated legacy records are persisted by `list_tasks` and by successful
//!   mutations; a rejected add writes nothing.
//! - Unknown ids on toggle/delete are silent no-ops.

use crate::model::task::{Task, TaskId};
use crate::registry::{self, AddTaskError, IdSource, TimestampIdSource};
use crate::storage::{KeyValueStorage, StorageError, StorageResult};
use crate::store::TaskStore;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Submitted text was blank after trimming.
    EmptyInput,
    /// Submitted text matches an existing task ignoring case.
    DuplicateTask(String),
    /// Persistence-layer failure.
    Storage(StorageError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "task text must not be empty"),
            Self::DuplicateTask(text) => write!(f, "task already exists: `{text}`"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AddTaskError> for TaskServiceError {
    fn from(value: AddTaskError) -> Self {
        match value {
            AddTaskError::EmptyInput => Self::EmptyInput,
            AddTaskError::DuplicateTask(text) => Self::DuplicateTask(text),
        }
    }
}

impl From<StorageError> for TaskServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Task service facade over a task store.
pub struct TaskService<S: KeyValueStorage, I: IdSource = TimestampIdSource> {
    store: TaskStore<S>,
    ids: I,
}

impl<S: KeyValueStorage> TaskService<S> {
    /// Creates a service generating ids from timestamps.
    pub fn new(store: TaskStore<S>) -> Self {
        Self::with_id_source(store, TimestampIdSource)
    }
}

impl<S: KeyValueStorage, I: IdSource> TaskService<S, I> {
    /// Creates a service with a caller-provided id source.
    pub fn with_id_source(store: TaskStore<S>, ids: I) -> Self {
        Self { store, ids }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Loads the current collection, persisting any migration first.
    pub fn list_tasks(&mut self) -> StorageResult<Vec<Task>> {
        let normalized = self.load_normalized()?;
        if normalized.migrated {
            self.store.save(&normalized.tasks)?;
            info!(
                "event=tasks_migrate module=service status=ok count={}",
                normalized.tasks.len()
            );
        }
        Ok(normalized.tasks)
    }

    fn load_normalized(&mut self) -> StorageResult<registry::Normalized> {
        let records = self.store.load()?;
        Ok(registry::normalize(records, &mut self.ids))
    }

    /// Validates and appends one task built from `text`.
    ///
    /// Returns the created task. The stored collection is unchanged on
    /// error.
    pub fn add_task(&mut self, text: &str) -> Result<Task, TaskServiceError> {
        if text.trim().is_empty() {
            return Err(TaskServiceError::EmptyInput);
        }
        // A pending migration is saved together with the new task.
        let mut tasks = self.load_normalized()?.tasks;
        let created = registry::add_task(text, &mut tasks, &mut self.ids)?;
        self.store.save(&tasks)?;
        info!(
            "event=task_add module=service status=ok id={} count={}",
            created.id,
            tasks.len()
        );
        Ok(created)
    }

    /// Flips completion of `id` and returns the reloaded collection.
    pub fn toggle_task(&mut self, id: &TaskId) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = self.list_tasks()?;
        if !tasks.iter().any(|task| &task.id == id) {
            debug!("event=task_toggle module=service status=noop id={id}");
        }
        self.store.save(&registry::toggle_complete(id, tasks))?;
        Ok(self.list_tasks()?)
    }

    /// Removes `id` and returns the reloaded collection.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = self.list_tasks()?;
        let before = tasks.len();
        let remaining = registry::remove_task(id, tasks);
        let status = if remaining.len() == before { "noop" } else { "ok" };
        self.store.save(&remaining)?;
        info!("event=task_delete module=service status={status} id={id}");
        Ok(self.list_tasks()?)
    }
}
