//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record persisted by the task store.
//! - Generate stable task identifiers at creation time.
//! - Provide list projections used by the list screen (filter, summary).
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reused.
//! - `title` is immutable after creation.
//! - `completed` starts as `false` and only changes through toggle.
//!
//! # See also
//! - crates/doitnow_core/src/store/task_store.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Titles offered by the list screen's quick-add row.
pub const QUICK_ADD_SUGGESTIONS: [&str; 4] = [
    "Review priorities",
    "Reply to emails",
    "Plan tomorrow",
    "Take a walk",
];

/// Opaque task identifier.
///
/// Serialized as a bare JSON string inside the persisted task object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh id from the current time plus a random suffix.
    ///
    /// Shape: `<unix-epoch-millis>-<7 lowercase base36 chars>`.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self(format!("{millis}-{}", random_suffix()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Single to-do item.
///
/// A stored record without `completed` reads as open. Fields this build does
/// not know are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates an open task with a generated id.
    ///
    /// The title is stored as given; callers normalize it first.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.into(),
            completed: false,
            extra: Map::new(),
        }
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Validation errors raised at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims raw user input and rejects blank titles.
pub fn normalize_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// List screen filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Returns matching tasks in their original order.
    pub fn apply(self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect()
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported task filter `{other}`; expected all|active|completed"
            )),
        }
    }
}

/// Progress counters over a full task list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// `completed / total`, or `0.0` for an empty list.
    pub progress: f64,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let progress = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            total,
            completed,
            active: total - completed,
            progress,
        }
    }

    /// Progress rounded to a whole percentage.
    pub fn progress_percent(&self) -> u32 {
        (self.progress * 100.0).round() as u32
    }
}

fn random_suffix() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(char::from(BASE36_DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    suffix
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_title, random_suffix, TaskFilter, TaskId, TaskSummary, TaskValidationError,
    };

    #[test]
    fn generated_id_has_millis_and_base36_suffix() {
        let id = TaskId::generate();
        let (millis, suffix) = id
            .as_str()
            .split_once('-')
            .expect("id should contain a separator");
        assert!(millis.parse::<u128>().is_ok());
        assert_eq!(suffix.len(), 7);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn random_suffixes_differ() {
        assert_ne!(random_suffix(), random_suffix());
    }

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  Buy milk \n").unwrap(), "Buy milk");
        assert_eq!(
            normalize_title("   ").unwrap_err(),
            TaskValidationError::EmptyTitle
        );
    }

    #[test]
    fn filter_parses_known_values() {
        assert_eq!("Active".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert_eq!(" all ".parse::<TaskFilter>().unwrap(), TaskFilter::All);
        assert!("done".parse::<TaskFilter>().is_err());
    }

    #[test]
    fn summary_of_empty_list_has_zero_progress() {
        let summary = TaskSummary::from_tasks(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.progress, 0.0);
        assert_eq!(summary.progress_percent(), 0);
    }
}
