//! File-backed persistence for the store's durable subset.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use guardian_core::error::{GuardianError, Result};
use guardian_core::store::{PersistedState, StateRepository};
use tokio::sync::Mutex;

use crate::paths::GuardianPaths;
use crate::storage::AtomicFile;

/// Stores [`PersistedState`] as `guardian-storage.json`.
///
/// Several processes may share the file. Saves merge into whatever is on
/// disk, writing only the fields this handle changed since it last loaded or
/// saved. Disk access runs on the blocking pool.
#[derive(Clone)]
pub struct StateRepositoryImpl {
    baseline: Arc<Mutex<PersistedState>>,
    file: Arc<AtomicFile<PersistedState>>,
}

impl StateRepositoryImpl {
    /// Opens the state file under `base_dir` (or the default location).
    ///
    /// A missing file yields the default state; it is not written until the
    /// first save.
    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let path = GuardianPaths::new(base_dir).state_file()?;
        let file = Arc::new(AtomicFile::<PersistedState>::json(path));

        let initial = read_file(file.clone()).await?;
        tracing::debug!(
            authenticated = initial.session.is_authenticated,
            role = %initial.user_role,
            "Loaded persisted state"
        );

        Ok(Self {
            baseline: Arc::new(Mutex::new(initial)),
            file,
        })
    }
}

async fn read_file(file: Arc<AtomicFile<PersistedState>>) -> Result<PersistedState> {
    let state = tokio::task::spawn_blocking(move || file.load())
        .await
        .map_err(|e| GuardianError::internal(format!("Failed to join task: {}", e)))??;
    Ok(state.unwrap_or_default())
}

#[async_trait]
impl StateRepository for StateRepositoryImpl {
    async fn get_state(&self) -> Result<PersistedState> {
        read_file(self.file.clone()).await
    }

    async fn save_state(&self, state: PersistedState) -> Result<()> {
        let mut baseline = self.baseline.lock().await;
        if *baseline == state {
            return Ok(());
        }

        let file = self.file.clone();
        let base = baseline.clone();
        let current = state.clone();
        tokio::task::spawn_blocking(move || {
            file.update(PersistedState::default(), |saved| {
                saved.merge_changes(&base, &current);
                Ok(())
            })
        })
        .await
        .map_err(|e| GuardianError::internal(format!("Failed to join task: {}", e)))??;

        *baseline = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::auth::Role;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();

        assert_eq!(repo.get_state().await.unwrap(), PersistedState::default());
        assert!(!temp_dir.path().join("guardian-storage.json").exists());
    }

    #[tokio::test]
    async fn test_saved_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let repo = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();

        let mut state = PersistedState::default();
        state.kill_switch = true;
        state.user_role = Role::Auditor;
        state.rate_limits.vip = 120;
        repo.save_state(state.clone()).await.unwrap();

        let reopened = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();
        assert_eq!(reopened.get_state().await.unwrap(), state);

        let raw = std::fs::read_to_string(temp_dir.path().join("guardian-storage.json")).unwrap();
        assert!(raw.contains("\"killSwitch\": true"));
        assert!(!raw.contains("tasks"));
    }

    #[tokio::test]
    async fn test_get_state_sees_other_handles() {
        let temp_dir = TempDir::new().unwrap();
        let first = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();
        let second = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();

        let mut state = PersistedState::default();
        state.kill_switch = true;
        second.save_state(state).await.unwrap();

        assert!(first.get_state().await.unwrap().kill_switch);
    }

    #[tokio::test]
    async fn test_save_keeps_fields_written_by_other_handles() {
        let temp_dir = TempDir::new().unwrap();
        let first = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();
        let second = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();

        let mut engaged = PersistedState::default();
        engaged.kill_switch = true;
        second.save_state(engaged).await.unwrap();

        // `first` still holds the stale flag but only changed the role
        let mut stale = PersistedState::default();
        stale.user_role = Role::Viewer;
        first.save_state(stale).await.unwrap();

        let reopened = StateRepositoryImpl::new(Some(temp_dir.path())).await.unwrap();
        let saved = reopened.get_state().await.unwrap();
        assert!(saved.kill_switch);
        assert_eq!(saved.user_role, Role::Viewer);
    }
}
