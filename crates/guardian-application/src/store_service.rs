//! Store service: the shared store plus its durable backing.

use std::sync::Arc;

use chrono::Utc;
use guardian_core::error::Result;
use guardian_core::rate_limit::RateLimitPolicy;
use guardian_core::simulation::{SimulationEvent, apply_event};
use guardian_core::store::{
    AppStore, Command, CommandOutcome, MAX_TASKS, SharedStore, StateRepository,
};
use guardian_core::task::seed::seed_tasks;
use guardian_core::task::{Task, TaskRepository};

/// Owns the [`SharedStore`] and writes it back after every applied command.
///
/// Persisted state goes to the [`StateRepository`]; individual tasks go to the
/// [`TaskRepository`].
pub struct StoreService {
    store: SharedStore,
    state_repository: Arc<dyn StateRepository>,
    task_repository: Arc<dyn TaskRepository>,
}

impl StoreService {
    /// Restores the store from its repositories.
    ///
    /// An empty task backend is seeded with the demo tasks; tasks past
    /// [`MAX_TASKS`] are deleted from it.
    pub async fn load(
        state_repository: Arc<dyn StateRepository>,
        task_repository: Arc<dyn TaskRepository>,
        policy: RateLimitPolicy,
    ) -> Result<Self> {
        let state = state_repository.get_state().await?;

        let mut tasks = task_repository.list_all().await?;
        if tasks.is_empty() {
            tasks = seed_tasks(Utc::now());
            for task in &tasks {
                task_repository.save(task).await?;
            }
            tracing::info!("[Bootstrap] Seeded {} demo tasks", tasks.len());
        } else if tasks.len() > MAX_TASKS {
            for task in tasks.split_off(MAX_TASKS) {
                delete_task(task_repository.as_ref(), &task.id).await?;
            }
            tracing::info!("[Bootstrap] Pruned task backend to {} tasks", MAX_TASKS);
        }

        let store = AppStore::restore(state, tasks).with_rate_limit_policy(policy);
        tracing::debug!(
            authenticated = store.is_authenticated(),
            tasks = store.tasks().len(),
            "Store restored"
        );

        Ok(Self {
            store: SharedStore::new(store),
            state_repository,
            task_repository,
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn task_repository(&self) -> &Arc<dyn TaskRepository> {
        &self.task_repository
    }

    /// Executes a command and persists the result when it changed anything.
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome> {
        let outcome = self.store.execute(command).await;
        if outcome.is_applied() {
            self.save().await?;
        }
        Ok(outcome)
    }

    /// Applies a simulation event, persisting any task it delivered.
    ///
    /// The saved kill switch is re-read first, and events are dropped while it
    /// is engaged. Tasks pushed out of the capped queue are deleted from the
    /// task repository.
    pub async fn apply_simulation_event(&self, event: SimulationEvent) -> Result<CommandOutcome> {
        self.refresh_kill_switch().await?;

        let arrived = match &event {
            SimulationEvent::TaskArrived(task) => Some(task.clone()),
            SimulationEvent::StatsDrift { .. } => None,
        };

        let (outcome, evicted) = self
            .store
            .update(|store| {
                // Checked under the write lock so a tick racing the kill switch is dropped
                if store.kill_switch() {
                    return (CommandOutcome::Unchanged, Vec::new());
                }
                let before: Vec<String> = store.tasks().iter().map(|t| t.id.clone()).collect();
                let outcome = apply_event(store, event);
                let evicted: Vec<String> = before
                    .into_iter()
                    .filter(|id| store.task(id).is_none())
                    .collect();
                (outcome, evicted)
            })
            .await;

        if outcome.is_applied() {
            if let Some(task) = arrived {
                self.task_repository.save(&task).await?;
            }
            for id in &evicted {
                delete_task(self.task_repository.as_ref(), id).await?;
            }
            self.save().await?;
        }
        Ok(outcome)
    }

    /// Adopts the kill switch as last saved, which may have been flipped by
    /// another process. Returns the saved value.
    pub async fn refresh_kill_switch(&self) -> Result<bool> {
        let active = self.state_repository.get_state().await?.kill_switch;
        self.store
            .update(|store| store.adopt_kill_switch(active))
            .await;
        Ok(active)
    }

    /// Writes the current task with `id` back to the task repository.
    pub async fn sync_task(&self, id: &str) -> Result<Option<Task>> {
        let task = self.store.read(|store| store.task(id).cloned()).await;
        if let Some(task) = &task {
            self.task_repository.save(task).await?;
        }
        Ok(task)
    }

    /// Persists the durable subset of the store.
    pub async fn save(&self) -> Result<()> {
        let state = self.store.persisted().await;
        self.state_repository.save_state(state).await
    }
}

/// Deletes a task, treating one already gone as deleted.
async fn delete_task(repository: &dyn TaskRepository, id: &str) -> Result<()> {
    match repository.delete(id).await {
        Err(e) if e.is_not_found() => Ok(()),
        other => other,
    }
}
