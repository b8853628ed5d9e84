//! Core domain logic for the Do It Now to-do list.
//! This crate is the single source of truth for task list invariants.

pub mod kv;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use kv::{KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    normalize_title, Task, TaskFilter, TaskId, TaskSummary, TaskValidationError,
    QUICK_ADD_SUGGESTIONS,
};
pub use service::task_service::{TaskService, TaskServiceError, TaskServiceResult};
pub use store::task_store::{TaskStore, STORAGE_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
