//! In-memory repositories for unit tests.

use async_trait::async_trait;
use guardian_core::error::Result;
use guardian_core::store::{PersistedState, StateRepository};
use guardian_core::task::{Task, TaskRepository};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryState(pub Mutex<PersistedState>);

#[async_trait]
impl StateRepository for MemoryState {
    async fn get_state(&self) -> Result<PersistedState> {
        Ok(self.0.lock().await.clone())
    }

    async fn save_state(&self, state: PersistedState) -> Result<()> {
        *self.0.lock().await = state;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTasks(pub Mutex<Vec<Task>>);

#[async_trait]
impl TaskRepository for MemoryTasks {
    async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.0.lock().await.iter().find(|t| t.id == id).cloned())
    }

    async fn save(&self, task: &Task) -> Result<()> {
        let mut tasks = self.0.lock().await;
        tasks.retain(|t| t.id != task.id);
        tasks.insert(0, task.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.0.lock().await.retain(|t| t.id != id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        let mut tasks = self.0.lock().await.clone();
        tasks.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(tasks)
    }
}
