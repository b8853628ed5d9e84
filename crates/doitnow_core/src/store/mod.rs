//! Task persistence layer.
//!
//! # Responsibility
//! - Own the canonical task list representation and its storage encoding.
//! - Expose the list/add/toggle/delete/clear-completed mutations.
//!
//! # Invariants
//! - The whole list is the unit of persistence; single tasks are never written.

pub mod task_store;
