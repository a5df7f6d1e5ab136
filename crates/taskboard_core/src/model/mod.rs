//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted wire shape (`id`, `text`, `completed`) in one place.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` unique within its collection.
//! - Deletion removes the record; there is no tombstone state.

pub mod task;
