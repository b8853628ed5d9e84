use doitnow_core::{KeyValueStore, KvError, SqliteKeyValueStore, TaskStore, STORAGE_KEY};
use rusqlite::Connection;

#[tokio::test]
async fn get_missing_key_returns_none() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    assert_eq!(kv.backend_name(), "sqlite");
    assert_eq!(kv.get("tasks").await.unwrap(), None);
}

#[tokio::test]
async fn set_overwrites_existing_value() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    kv.set("tasks", "[1]").await.unwrap();
    kv.set("tasks", "[2]").await.unwrap();
    kv.set("other", "x").await.unwrap();

    assert_eq!(kv.get("tasks").await.unwrap().as_deref(), Some("[2]"));
    assert_eq!(kv.get("other").await.unwrap().as_deref(), Some("x"));
}

#[tokio::test]
async fn task_list_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");

    let written = {
        let store = TaskStore::new(SqliteKeyValueStore::open(&path).unwrap());
        store.add("Buy milk").await.unwrap();
        let tasks = store.add("Walk dog").await.unwrap();
        store.toggle(&tasks[1].id).await.unwrap()
    };

    let reopened = TaskStore::new(SqliteKeyValueStore::open(&path).unwrap());
    assert_eq!(reopened.list().await.unwrap(), written);
}

#[tokio::test]
async fn corrupt_row_reads_as_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.sqlite3");
    let kv = SqliteKeyValueStore::open(&path).unwrap();
    kv.set(STORAGE_KEY, "[{\"id\":").await.unwrap();

    let store = TaskStore::new(kv);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_table_surfaces_as_storage_error() {
    let kv = SqliteKeyValueStore::new(Connection::open_in_memory().unwrap());
    let store = TaskStore::new(kv);

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, KvError::Sqlite(_)));
}
