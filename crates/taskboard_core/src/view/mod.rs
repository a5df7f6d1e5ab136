//! View renderer: projects the task collection onto a presentation surface
//! and turns surface gestures into task use-cases.
//!
//! # Responsibility
//! - Render one row per task in collection order.
//! - Dispatch submit/toggle/delete gestures to `TaskService`.
//! - Report validation failures as blocking notifications.
//!
//! # Invariants
//! - A successful add appends exactly one row; toggle/delete clear and
//!   re-render from the reloaded collection.
//! - A deferred delete mutates nothing until its removal transition ends.
//! - Storage failures are notified and logged; the view stays usable.

use crate::model::task::{Task, TaskId};
use crate::registry::{IdSource, TimestampIdSource};
use crate::service::task_service::{TaskService, TaskServiceError};
use crate::storage::KeyValueStorage;
use log::{error, warn};

pub mod directive;

pub use directive::{DirectiveQueue, RenderDirective};

/// Toggle control label for an active task.
pub const TOGGLE_LABEL_ACTIVE: &str = "Done";
/// Toggle control label for a completed task.
pub const TOGGLE_LABEL_COMPLETED: &str = "Undo";
pub const DELETE_LABEL: &str = "X";
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a task!";
pub const DUPLICATE_TASK_MESSAGE: &str = "That task already exists!";

/// Display projection of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    /// Rows for completed tasks render with a distinct (struck-through) state.
    pub completed: bool,
    pub toggle_label: &'static str,
    pub delete_label: &'static str,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            toggle_label: if task.completed {
                TOGGLE_LABEL_COMPLETED
            } else {
                TOGGLE_LABEL_ACTIVE
            },
            delete_label: DELETE_LABEL,
        }
    }
}

/// Gesture events emitted by a presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SubmitNewTask(String),
    ToggleTask(TaskId),
    DeleteTask(TaskId),
    /// The surface finished the removal transition it started for a row.
    RemovalTransitionEnded(TaskId),
}

/// How a surface removes a row when a delete gesture arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Apply the deletion right away.
    Immediate,
    /// A transition is running; the surface emits
    /// `ViewAction::RemovalTransitionEnded` when it completes.
    Deferred,
}

/// What handling one action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A task was created and its row appended.
    Added(Task),
    /// The list was fully re-rendered with this many rows.
    Rendered(usize),
    /// A delete is waiting for its removal transition.
    RemovalPending,
    /// Input was rejected; the message was shown to the user.
    Rejected(&'static str),
    /// The action referred to nothing actionable.
    Ignored,
    /// Storage failed; the message was shown to the user.
    Failed(String),
}

/// Rendering collaborator driven by `TaskView`.
pub trait PresentationSurface {
    fn clear_rows(&mut self);
    fn append_row(&mut self, row: &TaskRow);
    /// Blocking notification to the user.
    fn notify(&mut self, message: &str);
    fn clear_input(&mut self);

    fn begin_row_removal(&mut self, _id: &TaskId) -> RemovalMode {
        RemovalMode::Immediate
    }
}

/// View renderer bound to one task service and one surface.
pub struct TaskView<S: KeyValueStorage, P: PresentationSurface, I: IdSource = TimestampIdSource> {
    service: TaskService<S, I>,
    surface: P,
    pending_removals: Vec<TaskId>,
}

impl<S: KeyValueStorage, P: PresentationSurface, I: IdSource> TaskView<S, P, I> {
    pub fn new(service: TaskService<S, I>, surface: P) -> Self {
        Self {
            service,
            surface,
            pending_removals: Vec::new(),
        }
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn service_mut(&mut self) -> &mut TaskService<S, I> {
        &mut self.service
    }

    /// Ids whose deletion waits on a removal transition.
    pub fn pending_removals(&self) -> &[TaskId] {
        &self.pending_removals
    }

    /// Startup path: loads (and migrates) the collection, then renders it.
    pub fn load(&mut self) -> ActionOutcome {
        match self.service.list_tasks() {
            Ok(tasks) => {
                self.render_all(&tasks);
                ActionOutcome::Rendered(tasks.len())
            }
            Err(err) => self.report_failure("load", &TaskServiceError::Storage(err)),
        }
    }

    /// Replaces all rows with one row per task, in order.
    pub fn render_all(&mut self, tasks: &[Task]) {
        self.surface.clear_rows();
        for task in tasks {
            self.render_one(task);
        }
    }

    /// Appends one row for `task`.
    pub fn render_one(&mut self, task: &Task) {
        self.surface.append_row(&TaskRow::from(task));
    }

    pub fn handle(&mut self, action: ViewAction) -> ActionOutcome {
        match action {
            ViewAction::SubmitNewTask(text) => self.submit(&text),
            ViewAction::ToggleTask(id) => {
                let result = self.service.toggle_task(&id);
                self.rerender("toggle", result)
            }
            ViewAction::DeleteTask(id) => match self.surface.begin_row_removal(&id) {
                RemovalMode::Immediate => self.apply_delete(&id),
                RemovalMode::Deferred => {
                    if !self.pending_removals.contains(&id) {
                        self.pending_removals.push(id);
                    }
                    ActionOutcome::RemovalPending
                }
            },
            ViewAction::RemovalTransitionEnded(id) => {
                let Some(index) = self.pending_removals.iter().position(|pending| pending == &id)
                else {
                    warn!("event=view_action module=view status=ignored action=removal_end id={id}");
                    return ActionOutcome::Ignored;
                };
                self.pending_removals.swap_remove(index);
                self.apply_delete(&id)
            }
        }
    }

    fn submit(&mut self, text: &str) -> ActionOutcome {
        match self.service.add_task(text) {
            Ok(task) => {
                self.surface.clear_input();
                self.render_one(&task);
                ActionOutcome::Added(task)
            }
            Err(TaskServiceError::EmptyInput) => self.reject(EMPTY_INPUT_MESSAGE),
            Err(TaskServiceError::DuplicateTask(_)) => self.reject(DUPLICATE_TASK_MESSAGE),
            Err(err) => self.report_failure("add", &err),
        }
    }

    fn apply_delete(&mut self, id: &TaskId) -> ActionOutcome {
        let result = self.service.delete_task(id);
        self.rerender("delete", result)
    }

    fn rerender(
        &mut self,
        action: &'static str,
        result: Result<Vec<Task>, TaskServiceError>,
    ) -> ActionOutcome {
        match result {
            Ok(tasks) => {
                self.render_all(&tasks);
                ActionOutcome::Rendered(tasks.len())
            }
            Err(err) => self.report_failure(action, &err),
        }
    }

    fn reject(&mut self, message: &'static str) -> ActionOutcome {
        self.surface.notify(message);
        ActionOutcome::Rejected(message)
    }

    fn report_failure(&mut self, action: &'static str, err: &TaskServiceError) -> ActionOutcome {
        error!("event=view_action module=view status=error action={action} error={err}");
        let message = format!("Task storage failed during {action}: {err}");
        self.surface.notify(&message);
        ActionOutcome::Failed(message)
    }
}
