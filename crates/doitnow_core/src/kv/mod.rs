//! Key-value persistence seam used by the task store.
//!
//! # Responsibility
//! - Define the async get/set-by-key contract the store is written against.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings; encoding is the caller's concern.
//! - `set` fully replaces any previous value under the same key.
//! - A missing key is `Ok(None)`, never an error.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type KvResult<T> = Result<T, KvError>;

/// Failure of the underlying storage primitive.
#[derive(Debug)]
pub enum KvError {
    /// Backend cannot serve requests (lock poisoned, device storage gone).
    Unavailable(String),
    /// SQLite open, query or write failure.
    Sqlite(rusqlite::Error),
    /// Database file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "key-value schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Unavailable(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Asynchronous string key-value store scoped to the local device.
///
/// Implementations must be `Send + Sync` so a store can be shared with the
/// async FFI executor.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;

    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> KvResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value).await
    }
}
