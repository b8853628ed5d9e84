//! Task store over an injected key-value backend.
//!
//! # Responsibility
//! - Load the persisted task list, apply one mutation, write the list back.
//! - Return the full resulting list so callers can re-render directly.
//!
//! # Invariants
//! - Every operation reads the persisted list first; no in-memory cache.
//! - Every mutation ends with exactly one full-list `set` before returning.
//! - A missing or undecodable persisted value reads as an empty list.
//! - Only backend failures (`KvError`) propagate; lookup misses are no-ops.
//!
//! Concurrent mutations are last-write-wins: two overlapping read-modify-write
//! cycles can drop one of the updates.

use crate::kv::{KeyValueStore, KvResult};
use crate::model::task::{Task, TaskId};
use log::{debug, error, warn};
use serde_json::Value;

/// Fixed key holding the serialized task list.
pub const STORAGE_KEY: &str = "tasks";

/// Authoritative task list backed by a key-value store.
pub struct TaskStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Creates a store on top of the provided backend.
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns the backend this store writes to.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    /// Returns the current task list, newest first.
    ///
    /// Corrupt persisted data is not an error; see [`decode_tasks`].
    pub async fn list(&self) -> KvResult<Vec<Task>> {
        let raw = match self.kv.get(STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=tasks_load module=store status=error backend={} error={}",
                    self.kv.backend_name(),
                    err
                );
                return Err(err);
            }
        };
        Ok(raw.as_deref().map(decode_tasks).unwrap_or_default())
    }

    /// Prepends a new open task with a generated id.
    ///
    /// `title` is stored as given; input validation happens before this call.
    pub async fn add(&self, title: impl Into<String>) -> KvResult<Vec<Task>> {
        let mut tasks = self.list().await?;
        tasks.insert(0, Task::new(title));
        self.save("add", tasks).await
    }

    /// Flips `completed` on every task with `id`. Unknown ids leave the list as is.
    pub async fn toggle(&self, id: &TaskId) -> KvResult<Vec<Task>> {
        let mut tasks = self.list().await?;
        for task in tasks.iter_mut().filter(|task| &task.id == id) {
            task.toggle();
        }
        self.save("toggle", tasks).await
    }

    /// Removes every task with `id`, if any.
    pub async fn delete(&self, id: &TaskId) -> KvResult<Vec<Task>> {
        let mut tasks = self.list().await?;
        tasks.retain(|task| &task.id != id);
        self.save("delete", tasks).await
    }

    /// Removes every completed task.
    pub async fn clear_completed(&self) -> KvResult<Vec<Task>> {
        let mut tasks = self.list().await?;
        tasks.retain(|task| !task.completed);
        self.save("clear_completed", tasks).await
    }

    async fn save(&self, op: &'static str, tasks: Vec<Task>) -> KvResult<Vec<Task>> {
        let encoded = encode_tasks(&tasks);
        match self.kv.set(STORAGE_KEY, encoded.as_str()).await {
            Ok(()) => {
                debug!(
                    "event=tasks_save module=store status=ok op={} backend={} count={}",
                    op,
                    self.kv.backend_name(),
                    tasks.len()
                );
                Ok(tasks)
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=store status=error op={} backend={} error={}",
                    op,
                    self.kv.backend_name(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Decodes a persisted task list.
///
/// # Fallback
/// - A value that is not a JSON array decodes to an empty list, so reads keep
///   working after history gets corrupted. The next mutation overwrites it.
/// - Inside a valid array, each record decodes on its own. Records that lack
///   an `id` or `title` are skipped; every other record is kept.
pub fn decode_tasks(raw: &str) -> Vec<Task> {
    let records = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "event=tasks_decode module=store status=fallback bytes={} error_line={} error_column={}",
                raw.len(),
                err.line(),
                err.column()
            );
            return Vec::new();
        }
    };

    let total = records.len();
    let tasks: Vec<Task> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if tasks.len() < total {
        warn!(
            "event=tasks_decode module=store status=partial kept={} skipped={}",
            tasks.len(),
            total - tasks.len()
        );
    }
    tasks
}

/// Encodes a task list for persistence.
pub fn encode_tasks(tasks: &[Task]) -> String {
    // Tasks hold only JSON-native values with string keys; serialization cannot fail.
    serde_json::to_string(tasks).unwrap_or_else(|_| "[]".to_string())
}
