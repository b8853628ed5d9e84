//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list use cases to Dart via FRB.
//! - Translate core results into flat envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every task operation returns the full list plus a summary of it.
//! - Storage failures become `ok = false` envelopes; the UI treats them as
//!   no-ops and keeps its previous list.

use doitnow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    SqliteKeyValueStore, Task, TaskFilter, TaskId, TaskService, TaskServiceError, TaskServiceResult,
    TaskSummary, QUICK_ADD_SUGGESTIONS,
};
use log::warn;
use std::future::Future;
use std::path::PathBuf;
use std::sync::OnceLock;

const TASKS_DB_FILE_NAME: &str = "doitnow_tasks.sqlite3";
const TASKS_DB_PATH_ENV: &str = "DOITNOW_DB_PATH";
static TASKS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Titles for the list screen's quick-add chips.
#[flutter_rust_bridge::frb(sync)]
pub fn quick_add_suggestions() -> Vec<String> {
    QUICK_ADD_SUGGESTIONS
        .iter()
        .map(|title| (*title).to_string())
        .collect()
}

/// Task row as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Progress card numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummaryItem {
    pub total: u32,
    pub completed: u32,
    pub active: u32,
    /// Whole-number percentage for the progress bar.
    pub progress_percent: u32,
}

/// Response envelope shared by every task operation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListResponse {
    /// Whether the operation reached storage successfully.
    pub ok: bool,
    /// Tasks matching the requested filter, newest first.
    pub items: Vec<TaskItem>,
    /// Counters over the full list, independent of the filter.
    pub summary: TaskSummaryItem,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl TaskListResponse {
    fn from_tasks(tasks: &[Task], filter: TaskFilter, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            items: filter.apply(tasks).into_iter().map(to_task_item).collect(),
            summary: to_summary_item(&TaskSummary::from_tasks(tasks)),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            summary: to_summary_item(&TaskSummary::from_tasks(&[])),
            message: message.into(),
        }
    }
}

/// Lists tasks, optionally filtered by `all|active|completed`.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Unknown filter values fall back to `all`.
pub async fn tasks_list(filter: Option<String>) -> TaskListResponse {
    let filter = parse_filter(filter.as_deref());
    respond("tasks_list", filter, "Loaded.", |service| async move {
        service.store().list().await.map_err(TaskServiceError::from)
    })
    .await
}

/// Adds a task from the add-task screen or a quick-add chip.
///
/// # FFI contract
/// - Title is trimmed; blank titles fail without writing.
pub async fn tasks_add(title: String) -> TaskListResponse {
    respond("tasks_add", TaskFilter::All, "Task added.", |service| async move {
        service.add_task(title.as_str()).await
    })
    .await
}

/// Flips completion of one task. Unknown ids return the unchanged list.
pub async fn tasks_toggle(id: String) -> TaskListResponse {
    let id = TaskId::from(id);
    respond("tasks_toggle", TaskFilter::All, "Task updated.", |service| async move {
        service.toggle_task(&id).await
    })
    .await
}

/// Deletes one task. Unknown ids return the unchanged list.
pub async fn tasks_delete(id: String) -> TaskListResponse {
    let id = TaskId::from(id);
    respond("tasks_delete", TaskFilter::All, "Task deleted.", |service| async move {
        service.delete_task(&id).await
    })
    .await
}

/// Removes every completed task.
pub async fn tasks_clear_completed() -> TaskListResponse {
    respond(
        "tasks_clear_completed",
        TaskFilter::All,
        "Completed tasks cleared.",
        |service| async move { service.clear_completed().await },
    )
    .await
}

async fn respond<F, Fut>(
    op: &'static str,
    filter: TaskFilter,
    success_message: &str,
    f: F,
) -> TaskListResponse
where
    F: FnOnce(TaskService<SqliteKeyValueStore>) -> Fut,
    Fut: Future<Output = TaskServiceResult<Vec<Task>>>,
{
    let db_path = resolve_tasks_db_path();
    let kv = match SqliteKeyValueStore::open(&db_path) {
        Ok(kv) => kv,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op} error_code=db_open_failed");
            return TaskListResponse::failure(format!("{op} failed: {err}"));
        }
    };

    match f(TaskService::with_backend(kv)).await {
        Ok(tasks) => TaskListResponse::from_tasks(&tasks, filter, success_message),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op} error={err}");
            TaskListResponse::failure(format!("{op} failed: {err}"))
        }
    }
}

fn parse_filter(raw: Option<&str>) -> TaskFilter {
    raw.and_then(|value| value.parse().ok()).unwrap_or_default()
}

fn resolve_tasks_db_path() -> PathBuf {
    TASKS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(TASKS_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TASKS_DB_FILE_NAME)
        })
        .clone()
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title,
        completed: task.completed,
    }
}

fn to_summary_item(summary: &TaskSummary) -> TaskSummaryItem {
    TaskSummaryItem {
        total: u32::try_from(summary.total).unwrap_or(u32::MAX),
        completed: u32::try_from(summary.completed).unwrap_or(u32::MAX),
        active: u32::try_from(summary.active).unwrap_or(u32::MAX),
        progress_percent: summary.progress_percent(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, parse_filter, ping, quick_add_suggestions,
        resolve_tasks_db_path, tasks_add, tasks_clear_completed, tasks_delete, tasks_list,
        tasks_toggle, TASKS_DB_FILE_NAME, TASKS_DB_PATH,
    };
    use doitnow_core::TaskFilter;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static SHARED_DB: Mutex<()> = Mutex::new(());
    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn quick_add_suggestions_are_exposed() {
        assert_eq!(quick_add_suggestions()[0], "Review priorities");
    }

    #[test]
    fn parse_filter_falls_back_to_all() {
        assert_eq!(parse_filter(None), TaskFilter::All);
        assert_eq!(parse_filter(Some("bogus")), TaskFilter::All);
        assert_eq!(parse_filter(Some("completed")), TaskFilter::Completed);
    }

    // The tests below share one database file inside a private temp dir.
    // Mutations are last-write-wins, so they run one at a time and only assert
    // on tasks they created themselves.

    #[test]
    fn task_calls_use_a_private_database_file() {
        let _guard = lock_shared_db();
        let dir = TEST_DB_DIR.get().expect("temp dir should be initialized");

        let path = resolve_tasks_db_path();
        assert!(path.starts_with(dir.path()));
        assert_ne!(path, std::env::temp_dir().join(TASKS_DB_FILE_NAME));
    }

    #[tokio::test]
    async fn tasks_add_rejects_blank_title() {
        let _guard = lock_shared_db();
        let response = tasks_add("   ".to_string()).await;
        assert!(!response.ok);
        assert!(response.message.contains("empty"), "{}", response.message);
    }

    #[tokio::test]
    async fn tasks_add_toggle_and_filter_roundtrip() {
        let _guard = lock_shared_db();
        let title = unique_token("ffi-toggle");
        let added = tasks_add(format!("  {title}  ")).await;
        assert!(added.ok, "{}", added.message);
        let item = added.items[0].clone();
        assert_eq!(item.title, title);
        assert!(!item.completed);

        let toggled = tasks_toggle(item.id.clone()).await;
        assert!(toggled.ok, "{}", toggled.message);

        let completed = tasks_list(Some("completed".to_string())).await;
        assert!(completed.items.iter().any(|task| task.id == item.id));
        assert!(completed.items.iter().all(|task| task.completed));

        let active = tasks_list(Some("active".to_string())).await;
        assert!(active.items.iter().all(|task| task.id != item.id));
    }

    #[tokio::test]
    async fn tasks_delete_and_clear_completed_remove_tasks() {
        let _guard = lock_shared_db();
        let keep = unique_token("ffi-keep");
        let done = unique_token("ffi-done");
        let keep_id = tasks_add(keep).await.items[0].id.clone();
        let done_id = tasks_add(done).await.items[0].id.clone();

        tasks_toggle(done_id.clone()).await;
        let cleared = tasks_clear_completed().await;
        assert!(cleared.ok, "{}", cleared.message);
        assert!(cleared.items.iter().all(|task| task.id != done_id));
        assert!(cleared.items.iter().any(|task| task.id == keep_id));

        let deleted = tasks_delete(keep_id.clone()).await;
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.items.iter().all(|task| task.id != keep_id));
        assert_eq!(deleted.summary.total as usize, deleted.items.len());
    }

    fn lock_shared_db() -> MutexGuard<'static, ()> {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        // Ignored when already set by an earlier test; it is the same path.
        let _ = TASKS_DB_PATH.set(dir.path().join(TASKS_DB_FILE_NAME));
        SHARED_DB.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
