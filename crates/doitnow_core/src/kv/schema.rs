//! SQLite connection bootstrap for the key-value backend.
//!
//! # Responsibility
//! - Open file or in-memory connections ready for `kv_entries` access.
//! - Bring the schema up to the version this build understands.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`; version `n` means the
//!   first `n` entries of `SCHEMA_STEPS` have been applied.
//! - Pending steps run in one transaction; a failure leaves the file as it was.
//! - Files written by a newer build are refused, never downgraded.

use super::{KvError, KvResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Ordered schema steps; index `i` upgrades version `i` to `i + 1`.
const SCHEMA_STEPS: &[&str] = &[include_str!("0001_kv_entries.sql")];

/// Schema version produced by this build.
pub fn schema_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Opens (or creates) a database file with an up-to-date schema.
///
/// Emits `kv_open` events with duration and status.
pub fn open_file(path: impl AsRef<Path>) -> KvResult<Connection> {
    bootstrap("file", || Connection::open(path))
}

/// Opens a private in-memory database with an up-to-date schema.
pub fn open_memory() -> KvResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

fn bootstrap(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> KvResult<Connection> {
    let started_at = Instant::now();
    let result = open()
        .map_err(KvError::from)
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            upgrade(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=kv_open module=kv status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=kv_open module=kv status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn upgrade(conn: &mut Connection) -> KvResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let target = schema_version();

    if found > target {
        return Err(KvError::UnsupportedSchemaVersion {
            found,
            supported: target,
        });
    }
    if found == target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &SCHEMA_STEPS[found as usize..] {
        tx.execute_batch(step)?;
    }
    tx.pragma_update(None, "user_version", target)?;
    tx.commit()?;

    info!("event=kv_upgrade module=kv status=ok from_version={found} to_version={target}");
    Ok(())
}
