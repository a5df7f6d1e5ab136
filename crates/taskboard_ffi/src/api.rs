//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task list gestures (load, submit, toggle, delete) to the host.
//! - Return render directives the host applies to its list widget.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call reloads state from storage; nothing is cached between calls
//!   except the resolved configuration.

use std::sync::OnceLock;
use taskboard_core::db::open_db;
use taskboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ActionOutcome, CoreConfig, DirectiveQueue, RenderDirective, SqliteStorage, TaskId,
    TaskService, TaskStore, TaskView, ViewAction,
};

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Row payload for the host list widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowItem {
    pub id: String,
    pub text: String,
    /// Host renders completed rows struck through.
    pub completed: bool,
    pub toggle_label: String,
    pub delete_label: String,
}

/// One render instruction.
///
/// `kind` is one of `clear_rows|append_row|notify|clear_input`; `row` is set
/// for `append_row` and `message` for `notify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDirectiveItem {
    pub kind: String,
    pub row: Option<TaskRowItem>,
    pub message: Option<String>,
}

/// Response envelope for every task gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// `false` when input was rejected or storage failed.
    pub ok: bool,
    /// Created task ID for successful submissions.
    pub task_id: Option<String>,
    pub message: String,
    /// Directives to apply in order.
    pub directives: Vec<RenderDirectiveItem>,
}

/// Loads the stored list (migrating legacy records) and renders it.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_load() -> TaskActionResponse {
    run_load(resolve_config())
}

/// Submits new task text from the input field.
#[flutter_rust_bridge::frb(sync)]
pub fn task_submit(text: String) -> TaskActionResponse {
    run_action(resolve_config(), ViewAction::SubmitNewTask(text))
}

/// Toggles completion of the row with `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskActionResponse {
    run_action(resolve_config(), ViewAction::ToggleTask(TaskId::new(id)))
}

/// Deletes the row with `id`.
///
/// Hosts run their own removal animation before calling this.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    run_action(resolve_config(), ViewAction::DeleteTask(TaskId::new(id)))
}

fn resolve_config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn run_load(config: &CoreConfig) -> TaskActionResponse {
    with_task_view(config, |view| view.load())
}

fn run_action(config: &CoreConfig, action: ViewAction) -> TaskActionResponse {
    with_task_view(config, |view| view.handle(action))
}

fn with_task_view(
    config: &CoreConfig,
    f: impl FnOnce(&mut TaskView<SqliteStorage<'_>, DirectiveQueue>) -> ActionOutcome,
) -> TaskActionResponse {
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            log::error!("event=ffi_call module=ffi status=error error_code=db_open_failed error={err}");
            return TaskActionResponse {
                ok: false,
                task_id: None,
                message: format!("task storage open failed: {err}"),
                directives: Vec::new(),
            };
        }
    };

    let store = TaskStore::new(SqliteStorage::new(&conn), config.storage_key.as_str());
    let mut view = TaskView::new(TaskService::new(store), DirectiveQueue::new());
    let outcome = f(&mut view);
    let directives = view
        .surface_mut()
        .drain()
        .into_iter()
        .map(to_directive_item)
        .collect();

    let (ok, task_id, message) = match outcome {
        ActionOutcome::Added(task) => (true, Some(task.id.to_string()), "Task added.".to_string()),
        ActionOutcome::Rendered(count) => (true, None, format!("{count} task(s).")),
        ActionOutcome::RemovalPending => (true, None, "Removal pending.".to_string()),
        ActionOutcome::Ignored => (true, None, "Nothing to do.".to_string()),
        ActionOutcome::Rejected(message) => (false, None, message.to_string()),
        ActionOutcome::Failed(message) => (false, None, message),
    };

    TaskActionResponse {
        ok,
        task_id,
        message,
        directives,
    }
}

fn to_directive_item(directive: RenderDirective) -> RenderDirectiveItem {
    match directive {
        RenderDirective::ClearRows => directive_item("clear_rows", None, None),
        RenderDirective::AppendRow(row) => directive_item(
            "append_row",
            Some(TaskRowItem {
                id: row.id.to_string(),
                text: row.text,
                completed: row.completed,
                toggle_label: row.toggle_label.to_string(),
                delete_label: row.delete_label.to_string(),
            }),
            None,
        ),
        RenderDirective::Notify(message) => directive_item("notify", None, Some(message)),
        RenderDirective::ClearInput => directive_item("clear_input", None, None),
    }
}

fn directive_item(
    kind: &str,
    row: Option<TaskRowItem>,
    message: Option<String>,
) -> RenderDirectiveItem {
    RenderDirectiveItem {
        kind: kind.to_string(),
        row,
        message,
    }
}
