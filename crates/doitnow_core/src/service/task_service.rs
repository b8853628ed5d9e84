//! Task use-case service.
//!
//! # Responsibility
//! - Validate user input before it reaches the task store.
//! - Provide list-screen projections (filtered list, progress summary).
//!
//! # Invariants
//! - Titles are trimmed and non-empty before `TaskStore::add` is called.
//! - Projections never write; they are computed from one `list()` read.

use crate::kv::{KeyValueStore, KvError};
use crate::model::task::{
    normalize_title, Task, TaskFilter, TaskId, TaskSummary, TaskValidationError,
};
use crate::store::task_store::TaskStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Input rejected before touching storage.
    Validation(TaskValidationError),
    /// Persistence-layer failure.
    Storage(KvError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for TaskServiceError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Use-case service wrapper around [`TaskStore`].
pub struct TaskService<S: KeyValueStore> {
    store: TaskStore<S>,
}

impl<S: KeyValueStore> TaskService<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self { store }
    }

    /// Creates a service directly on top of a key-value backend.
    pub fn with_backend(kv: S) -> Self {
        Self::new(TaskStore::new(kv))
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Adds a task from raw text input.
    ///
    /// # Contract
    /// - Trims the title; blank input fails with `Validation` and writes nothing.
    /// - Returns the full updated list, newest first.
    pub async fn add_task(&self, raw_title: &str) -> TaskServiceResult<Vec<Task>> {
        let title = normalize_title(raw_title)?;
        Ok(self.store.add(title).await?)
    }

    /// Adds one of the quick-add suggestions.
    pub async fn quick_add(&self, title: &str) -> TaskServiceResult<Vec<Task>> {
        self.add_task(title).await
    }

    pub async fn toggle_task(&self, id: &TaskId) -> TaskServiceResult<Vec<Task>> {
        Ok(self.store.toggle(id).await?)
    }

    pub async fn delete_task(&self, id: &TaskId) -> TaskServiceResult<Vec<Task>> {
        Ok(self.store.delete(id).await?)
    }

    pub async fn clear_completed(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.store.clear_completed().await?)
    }

    /// Lists tasks matching `filter`, newest first.
    pub async fn list_filtered(&self, filter: TaskFilter) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.store.list().await?;
        Ok(filter.apply(&tasks))
    }

    /// Computes progress counters over the full list.
    pub async fn summary(&self) -> TaskServiceResult<TaskSummary> {
        let tasks = self.store.list().await?;
        Ok(TaskSummary::from_tasks(&tasks))
    }
}
