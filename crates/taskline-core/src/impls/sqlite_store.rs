//! SqliteTaskStore - SQLite による正本
//!
//! # 実装詳細
//! - 1 本の Connection を std Mutex で共有（SQLite の書き込みは直列化される）
//! - rusqlite は同期 API なので spawn_blocking で実行する
//! - id は `INTEGER PRIMARY KEY AUTOINCREMENT` で採番

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use thiserror::Error;
use tracing::debug;

use crate::domain::{NewTask, Task, TaskId, TaskStatus};
use crate::ports::{StoreError, StoreResult, TaskStore};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        completed BOOLEAN NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL
    );
"#;

#[derive(Debug, Error)]
#[error("sqlite connection mutex poisoned")]
struct PoisonedConnection;

/// SQLite-backed task store.
///
/// Cheap to clone; clones share the same connection.
#[derive(Clone)]
pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteTaskStore {
    /// Open (or create) the database file at `path` and make sure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(StoreError::persistence)?;
        }
        let conn = Connection::open(&path).map_err(StoreError::persistence)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
            .map_err(StoreError::persistence)?;
        debug!(path = %path.display(), "opened sqlite task store");
        Self::with_schema(conn, Some(path))
    }

    /// A private in-memory database, gone when the last clone is dropped.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::persistence)?;
        Self::with_schema(conn, None)
    }

    fn with_schema(conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA).map_err(StoreError::persistence)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::persistence(PoisonedConnection))?;
            f(&guard)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;
    let status = status
        .parse::<TaskStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Task {
        id: TaskId::new(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        status,
        created_at: row.get(5)?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn insert(&self, task: &NewTask) -> StoreResult<TaskId> {
        let task = task.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, completed, status, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    task.title(),
                    task.description(),
                    task.completed(),
                    task.status().as_str(),
                    task.created_at(),
                ],
            )
            .map_err(StoreError::persistence)?;
            Ok(TaskId::new(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> StoreResult<()> {
        self.with_conn(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE tasks SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), id.get()],
                )
                .map_err(StoreError::persistence)?;
            if changed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, title, description, completed, status, created_at FROM tasks",
                )
                .map_err(StoreError::persistence)?;
            let rows = stmt
                .query_map([], row_to_task)
                .map_err(StoreError::persistence)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StoreError::persistence)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_task(title: &str) -> NewTask {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        NewTask::new(title, format!("{title} description"), at).unwrap()
    }

    #[tokio::test]
    async fn insert_then_list_roundtrips_all_columns() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let id = store.insert(&new_task("A")).await.unwrap();

        let tasks = store.list_all().await.unwrap();
        assert_eq!(tasks, vec![Task::from_new(id, new_task("A"))]);
    }

    #[tokio::test]
    async fn ids_are_distinct_and_increasing() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let a = store.insert(&new_task("a")).await.unwrap();
        let b = store.insert(&new_task("b")).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn update_status_persists() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let id = store.insert(&new_task("a")).await.unwrap();

        store.update_status(id, TaskStatus::Completed).await.unwrap();

        let task = store.list_all().await.unwrap().remove(0);
        assert_eq!(task.status, TaskStatus::Completed);
        // completed フラグは触らない
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn update_status_on_missing_row_is_not_found() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let err = store
            .update_status(TaskId::new(404), TaskStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == TaskId::new(404)));
    }

    #[tokio::test]
    async fn unknown_status_in_row_is_a_persistence_error() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO tasks (title, status, created_at) VALUES ('x', 'bogus', '2024-01-01T00:00:00Z')",
                    [],
                )
                .map_err(StoreError::persistence)?;
                Ok(())
            })
            .await
            .unwrap();

        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.db");

        let id = {
            let store = SqliteTaskStore::open(&path).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store.insert(&new_task("durable")).await.unwrap()
        };

        let reopened = SqliteTaskStore::open(&path).unwrap();
        let tasks = reopened.list_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].title, "durable");
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let mut joins = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            joins.push(tokio::spawn(async move {
                store.insert(&new_task(&format!("t{i}"))).await.unwrap()
            }));
        }
        let mut ids = Vec::new();
        for j in joins {
            ids.push(j.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert_eq!(store.list_all().await.unwrap().len(), 20);
    }
}
