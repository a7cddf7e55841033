//! InMemoryTaskStore - テスト・開発用の正本
//!
//! # 実装詳細
//! - BTreeMap に保持するので list は id 順
//! - 成功した update_status を順に記録する（重複処理の検出用）
//! - 故障注入で insert / list / update を失敗させられる

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{NewTask, Task, TaskId, TaskStatus};
use crate::ports::{StoreError, StoreResult, TaskStore};

#[derive(Debug, Error)]
#[error("injected {0} failure")]
struct InjectedFault(&'static str);

#[derive(Debug, Default)]
struct Faults {
    insert: bool,
    list: bool,
    update: bool,
    /// Fail this many updates, then recover.
    update_budget: u32,
}

struct InMemoryStoreState {
    rows: BTreeMap<TaskId, Task>,
    next_id: i64,
    updates: Vec<(TaskId, TaskStatus)>,
    faults: Faults,
}

impl InMemoryStoreState {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            updates: Vec::new(),
            faults: Faults::default(),
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn take_update_fault(&mut self) -> bool {
        if self.faults.update {
            return true;
        }
        if self.faults.update_budget > 0 {
            self.faults.update_budget -= 1;
            return true;
        }
        false
    }
}

/// In-memory task store.
pub struct InMemoryTaskStore {
    state: Mutex<InMemoryStoreState>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryStoreState::new()),
        }
    }

    /// Make every `insert` fail until switched off.
    pub async fn set_fail_inserts(&self, fail: bool) {
        self.state.lock().await.faults.insert = fail;
    }

    /// Make every `list_all` fail until switched off.
    pub async fn set_fail_lists(&self, fail: bool) {
        self.state.lock().await.faults.list = fail;
    }

    /// Make every `update_status` fail until switched off.
    pub async fn set_fail_updates(&self, fail: bool) {
        self.state.lock().await.faults.update = fail;
    }

    /// Fail the next `n` calls to `update_status`.
    pub async fn fail_next_updates(&self, n: u32) {
        self.state.lock().await.faults.update_budget = n;
    }

    /// Successful status updates, in the order they were applied.
    pub async fn status_updates(&self) -> Vec<(TaskId, TaskStatus)> {
        self.state.lock().await.updates.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn get(&self, id: TaskId) -> Option<Task> {
        self.state.lock().await.rows.get(&id).cloned()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: &NewTask) -> StoreResult<TaskId> {
        let mut state = self.state.lock().await;
        if state.faults.insert {
            return Err(StoreError::persistence(InjectedFault("insert")));
        }
        let id = state.allocate_id();
        state.rows.insert(id, Task::from_new(id, task.clone()));
        Ok(id)
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.take_update_fault() {
            return Err(StoreError::persistence(InjectedFault("update")));
        }
        let Some(row) = state.rows.get_mut(&id) else {
            return Err(StoreError::NotFound(id));
        };
        row.status = status;
        state.updates.push((id, status));
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        let state = self.state.lock().await;
        if state.faults.list {
            return Err(StoreError::persistence(InjectedFault("list")));
        }
        Ok(state.rows.values().cloned().collect())
    }
}
