use serde_json::json;
use taskboard_core::view::{DUPLICATE_TASK_MESSAGE, EMPTY_INPUT_MESSAGE};
use taskboard_core::{
    ActionOutcome, DirectiveQueue, KeyValueStorage, MemoryStorage, PresentationSurface,
    RemovalMode, RenderDirective, StorageError, StorageResult, TaskId, TaskRow, TaskService,
    TaskStore, TaskView, ViewAction,
};

fn view_over(storage: &MemoryStorage) -> TaskView<&MemoryStorage, DirectiveQueue> {
    TaskView::new(
        TaskService::new(TaskStore::with_default_key(storage)),
        DirectiveQueue::new(),
    )
}

fn row_texts(queue: &DirectiveQueue) -> Vec<String> {
    queue
        .visible_rows()
        .iter()
        .map(|row| format!("{}:{}", row.text, row.toggle_label))
        .collect()
}

#[test]
fn load_renders_rows_in_stored_order() {
    let payload = json!([
        {"id": "1", "text": "First", "completed": false},
        {"id": "2", "text": "Second", "completed": true},
    ]);
    let storage = MemoryStorage::with_item("tasks", payload.to_string());
    let mut view = view_over(&storage);

    assert_eq!(view.load(), ActionOutcome::Rendered(2));

    let directives = view.surface_mut().drain();
    assert_eq!(directives[0], RenderDirective::ClearRows);
    let rows: Vec<&TaskRow> = directives
        .iter()
        .filter_map(|directive| match directive {
            RenderDirective::AppendRow(row) => Some(row),
            _ => None,
        })
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text, "First");
    assert_eq!(rows[0].toggle_label, "Done");
    assert!(!rows[0].completed);
    assert_eq!(rows[1].toggle_label, "Undo");
    assert!(rows[1].completed);
    assert_eq!(rows[1].delete_label, "X");
}

#[test]
fn submit_appends_single_row_without_rerender() {
    let storage = MemoryStorage::new();
    let mut view = view_over(&storage);
    view.load();
    view.handle(ViewAction::SubmitNewTask("Buy milk".to_string()));
    view.surface_mut().drain();

    let outcome = view.handle(ViewAction::SubmitNewTask("  Walk dog ".to_string()));

    let ActionOutcome::Added(task) = outcome else {
        panic!("expected Added, got {outcome:?}");
    };
    assert_eq!(task.text, "Walk dog");
    assert_eq!(
        view.surface_mut().drain(),
        vec![
            RenderDirective::ClearInput,
            RenderDirective::AppendRow(TaskRow::from(&task)),
        ]
    );
}

#[test]
fn invalid_submissions_notify_and_change_nothing() {
    let storage = MemoryStorage::new();
    let mut view = view_over(&storage);
    view.handle(ViewAction::SubmitNewTask("Buy milk".to_string()));
    view.surface_mut().drain();

    assert_eq!(
        view.handle(ViewAction::SubmitNewTask("   ".to_string())),
        ActionOutcome::Rejected(EMPTY_INPUT_MESSAGE)
    );
    assert_eq!(
        view.handle(ViewAction::SubmitNewTask("BUY MILK".to_string())),
        ActionOutcome::Rejected(DUPLICATE_TASK_MESSAGE)
    );

    assert_eq!(
        view.surface_mut().drain(),
        vec![
            RenderDirective::Notify("Please enter a task!".to_string()),
            RenderDirective::Notify("That task already exists!".to_string()),
        ]
    );
    assert_eq!(view.service_mut().list_tasks().unwrap().len(), 1);
}

#[test]
fn toggle_and_delete_rerender_full_list() {
    let storage = MemoryStorage::new();
    let mut view = view_over(&storage);
    let ActionOutcome::Added(milk) = view.handle(ViewAction::SubmitNewTask("Buy milk".into()))
    else {
        panic!("add should succeed");
    };
    view.handle(ViewAction::SubmitNewTask("Walk dog".into()));

    assert_eq!(
        view.handle(ViewAction::ToggleTask(milk.id.clone())),
        ActionOutcome::Rendered(2)
    );
    assert_eq!(row_texts(view.surface()), vec!["Buy milk:Undo", "Walk dog:Done"]);

    view.surface_mut().drain();
    assert_eq!(
        view.handle(ViewAction::DeleteTask(milk.id)),
        ActionOutcome::Rendered(1)
    );
    let directives = view.surface().directives();
    assert_eq!(directives.first(), Some(&RenderDirective::ClearRows));
    assert_eq!(row_texts(view.surface()), vec!["Walk dog:Done"]);
}

#[test]
fn toggle_unknown_id_rerenders_unchanged_list() {
    let storage = MemoryStorage::new();
    let mut view = view_over(&storage);
    view.handle(ViewAction::SubmitNewTask("Buy milk".into()));

    let outcome = view.handle(ViewAction::ToggleTask(TaskId::from("ghost")));

    assert_eq!(outcome, ActionOutcome::Rendered(1));
    assert_eq!(row_texts(view.surface()), vec!["Buy milk:Done"]);
}

/// Surface that fades rows out before they are removed.
#[derive(Default)]
struct FadingSurface {
    rows: Vec<TaskRow>,
    fading: Vec<TaskId>,
    notifications: Vec<String>,
}

impl PresentationSurface for FadingSurface {
    fn clear_rows(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: &TaskRow) {
        self.rows.push(row.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn clear_input(&mut self) {}

    fn begin_row_removal(&mut self, id: &TaskId) -> RemovalMode {
        self.fading.push(id.clone());
        RemovalMode::Deferred
    }
}

#[test]
fn deferred_delete_applies_after_transition_ends() {
    let storage = MemoryStorage::new();
    let mut view = TaskView::new(
        TaskService::new(TaskStore::with_default_key(&storage)),
        FadingSurface::default(),
    );
    let ActionOutcome::Added(task) = view.handle(ViewAction::SubmitNewTask("Buy milk".into()))
    else {
        panic!("add should succeed");
    };

    assert_eq!(
        view.handle(ViewAction::DeleteTask(task.id.clone())),
        ActionOutcome::RemovalPending
    );
    assert_eq!(view.surface().fading, vec![task.id.clone()]);
    assert_eq!(view.pending_removals(), &[task.id.clone()]);
    assert_eq!(view.service_mut().list_tasks().unwrap().len(), 1);
    assert_eq!(view.surface().rows.len(), 1);

    assert_eq!(
        view.handle(ViewAction::RemovalTransitionEnded(task.id.clone())),
        ActionOutcome::Rendered(0)
    );
    assert!(view.pending_removals().is_empty());
    assert!(view.surface().rows.is_empty());
    assert!(view.service_mut().list_tasks().unwrap().is_empty());

    assert_eq!(
        view.handle(ViewAction::RemovalTransitionEnded(task.id)),
        ActionOutcome::Ignored
    );
    assert!(view.surface().notifications.is_empty());
}

/// Storage that serves reads but refuses every write.
struct ReadOnlyStorage(MemoryStorage);

impl KeyValueStorage for ReadOnlyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.0.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }
}

#[test]
fn storage_failure_is_notified_and_view_keeps_working() {
    let payload = json!([{"id": "1", "text": "First", "completed": false}]);
    let storage = ReadOnlyStorage(MemoryStorage::with_item("tasks", payload.to_string()));
    let mut view = TaskView::new(
        TaskService::new(TaskStore::with_default_key(&storage)),
        DirectiveQueue::new(),
    );

    let outcome = view.handle(ViewAction::SubmitNewTask("Buy milk".to_string()));
    let ActionOutcome::Failed(message) = outcome else {
        panic!("expected Failed, got {outcome:?}");
    };
    assert!(message.contains("during add"), "{message}");
    assert!(message.contains("disk full"), "{message}");
    assert_eq!(
        view.surface_mut().drain(),
        vec![RenderDirective::Notify(message)]
    );

    let outcome = view.handle(ViewAction::ToggleTask(TaskId::from("1")));
    assert!(matches!(outcome, ActionOutcome::Failed(_)), "{outcome:?}");
    view.surface_mut().drain();

    assert_eq!(view.load(), ActionOutcome::Rendered(1));
    assert_eq!(row_texts(view.surface()), vec!["First:Done"]);
}
