use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::model::{NewTask, Task, TaskFilter, TaskPatch, TaskStats};
use crate::clock::{Clock, SystemClock};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Missing, or owned by someone else. Callers can't tell which.
    #[error("task not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Owner-scoped task storage. Every lookup takes the caller's id and treats
/// a foreign task exactly like a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(
        &self,
        owner_id: &str,
        fields: NewTask,
        created_by: &str,
    ) -> Result<Task, StoreError>;
    async fn get(&self, id: Uuid, owner_id: &str) -> Result<Task, StoreError>;
    async fn list(&self, owner_id: &str, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;
    async fn update(
        &self,
        id: Uuid,
        owner_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, StoreError>;
    async fn delete(&self, id: Uuid, owner_id: &str) -> Result<Uuid, StoreError>;
    async fn stats(&self, owner_id: &str) -> Result<TaskStats, StoreError>;
}

/// Process-local store; one lock guards the whole map.
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(
        &self,
        owner_id: &str,
        fields: NewTask,
        created_by: &str,
    ) -> Result<Task, StoreError> {
        let now = self.clock.now();
        let mut tasks = self.tasks.write().await;
        let mut id = Uuid::new_v4();
        while tasks.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let task = Task {
            id,
            user_id: owner_id.to_owned(),
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            status: fields.status,
            due_date: fields.due_date,
            created_at: now,
            updated_at: now,
            created_by: created_by.to_owned(),
        };
        tasks.insert(id, task.clone());
        debug!(task_id = %id, owner_id, "task stored");
        Ok(task)
    }

    async fn get(&self, id: Uuid, owner_id: &str) -> Result<Task, StoreError> {
        let tasks = self.tasks.read().await;
        tasks
            .get(&id)
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, owner_id: &str, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(filter.apply(tasks.values().filter(|t| t.user_id == owner_id)))
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, StoreError> {
        let now = self.clock.now();
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&id)
            .filter(|t| t.user_id == owner_id)
            .ok_or(StoreError::NotFound)?;
        patch.apply(task);
        task.updated_at = now.max(task.updated_at);
        debug!(task_id = %id, owner_id, "task updated");
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid, owner_id: &str) -> Result<Uuid, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get(&id) {
            Some(t) if t.user_id == owner_id => {
                tasks.remove(&id);
                debug!(task_id = %id, owner_id, "task removed");
                Ok(id)
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn stats(&self, owner_id: &str) -> Result<TaskStats, StoreError> {
        let now = self.clock.now();
        let tasks = self.tasks.read().await;
        Ok(TaskStats::collect(
            tasks.values().filter(|t| t.user_id == owner_id),
            now,
        ))
    }
}
