//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and registry calls into use-case level APIs.
//! - Keep presentation/FFI layers decoupled from storage details.

pub mod task_service;
