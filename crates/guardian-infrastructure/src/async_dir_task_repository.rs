//! Directory-backed TaskRepository implementation

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use guardian_core::error::{GuardianError, Result};
use guardian_core::task::{Task, TaskRepository};

use crate::paths::GuardianPaths;

/// Task repository storing one JSON document per task.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── tasks/
///     ├── t-101.json
///     └── live-1718000000000-42.json
/// ```
pub struct AsyncDirTaskRepository {
    dir: PathBuf,
}

impl AsyncDirTaskRepository {
    /// Creates the repository under `base_dir` (or the default location),
    /// creating the `tasks/` directory if needed.
    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let dir = GuardianPaths::new(base_dir).tasks_dir()?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| GuardianError::io(format!("Failed to create task storage: {}", e)))?;
        Ok(Self { dir })
    }

    fn task_path(&self, task_id: &str) -> Result<PathBuf> {
        // Ids become file names; reject anything that could escape the directory
        if task_id.is_empty()
            || task_id.contains(['/', '\\'])
            || task_id.starts_with('.')
        {
            return Err(GuardianError::not_found("task", task_id));
        }
        Ok(self.dir.join(format!("{task_id}.json")))
    }
}

#[async_trait]
impl TaskRepository for AsyncDirTaskRepository {
    async fn find_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        let Ok(path) = self.task_path(task_id) else {
            return Ok(None);
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, task: &Task) -> Result<()> {
        let path = self.task_path(&task.id)?;
        let content = serde_json::to_string_pretty(task)?;

        let tmp_path = self.dir.join(format!(".{}.tmp", task.id));
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| GuardianError::io(format!("Failed to save task: {}", e)))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| GuardianError::io(format!("Failed to save task: {}", e)))?;
        Ok(())
    }

    async fn delete(&self, task_id: &str) -> Result<()> {
        let path = self.task_path(task_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(GuardianError::not_found("task", task_id))
            }
            Err(e) => Err(GuardianError::io(format!("Failed to delete task: {}", e))),
        }
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| GuardianError::io(format!("Failed to load all tasks: {}", e)))?;

        let mut tasks = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<Task>(&content) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable task file");
                }
            }
        }

        // Sort by creation time descending (most recent first)
        tasks.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guardian_core::task::seed::seed_tasks;
    use guardian_core::task::TaskStatus;
    use tempfile::TempDir;

    async fn create_test_repository() -> (AsyncDirTaskRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AsyncDirTaskRepository::new(Some(temp_dir.path())).await.unwrap();
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let (repo, _temp_dir) = create_test_repository().await;
        let task = seed_tasks(Utc::now()).remove(0);

        repo.save(&task).await.unwrap();

        assert_eq!(repo.find_by_id(&task.id).await.unwrap(), Some(task));
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let (repo, _temp_dir) = create_test_repository().await;
        let mut task = seed_tasks(Utc::now()).remove(0);
        repo.save(&task).await.unwrap();

        task.status = TaskStatus::Rejected;
        repo.save(&task).await.unwrap();

        let loaded = repo.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, TaskStatus::Rejected);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let (repo, _temp_dir) = create_test_repository().await;
        for task in seed_tasks(Utc::now()) {
            repo.save(&task).await.unwrap();
        }

        let ids: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t-103", "t-102", "t-101"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, _temp_dir) = create_test_repository().await;
        let task = seed_tasks(Utc::now()).remove(1);
        repo.save(&task).await.unwrap();

        repo.delete(&task.id).await.unwrap();

        assert!(repo.find_by_id(&task.id).await.unwrap().is_none());
        assert!(repo.delete(&task.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_path_like_ids_are_rejected() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert!(repo.find_by_id("../secret").await.unwrap().is_none());
    }
}
