//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define canonical data structures used by the task store and services.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the persisted list; there are no tombstones.

pub mod task;
