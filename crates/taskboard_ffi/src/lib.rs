//! Host-facing bridge for UI shells.

pub mod api;
