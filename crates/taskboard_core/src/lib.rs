//! Core domain logic for Taskboard.
//! This crate is the single source of truth for task list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod registry;
pub mod service;
pub mod storage;
pub mod store;
pub mod view;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::task::{StoredTask, Task, TaskId};
pub use registry::{AddTaskError, IdSource, Normalized, TimestampIdSource};
pub use service::task_service::{TaskService, TaskServiceError};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};
pub use store::{TaskStore, DEFAULT_STORAGE_KEY};
pub use view::{
    ActionOutcome, DirectiveQueue, PresentationSurface, RemovalMode, RenderDirective, TaskRow,
    TaskView, ViewAction,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
