use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use super::{AppStore, Command, CommandOutcome, PersistedState};

/// Cloneable handle to one [`AppStore`], shared by the CLI and background timers.
///
/// Writes are serialized through a single lock, so simulation ticks and user
/// actions never interleave inside a command. The kill-switch state is also
/// published on a watch channel so long-running loops can halt without polling.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<AppStore>>,
    kill_switch_tx: Arc<watch::Sender<bool>>,
}

impl SharedStore {
    pub fn new(store: AppStore) -> Self {
        let (kill_switch_tx, _) = watch::channel(store.kill_switch());
        Self {
            inner: Arc::new(RwLock::new(store)),
            kill_switch_tx: Arc::new(kill_switch_tx),
        }
    }

    /// Executes a command under the write lock.
    pub async fn execute(&self, command: Command) -> CommandOutcome {
        let mut store = self.inner.write().await;
        let outcome = store.execute(command);
        self.publish_kill_switch(store.kill_switch());
        outcome
    }

    /// Runs `f` with read access to the store.
    pub async fn read<R>(&self, f: impl FnOnce(&AppStore) -> R) -> R {
        let store = self.inner.read().await;
        f(&store)
    }

    /// Runs `f` with write access, for multi-command sequences that must not interleave.
    pub async fn update<R>(&self, f: impl FnOnce(&mut AppStore) -> R) -> R {
        let mut store = self.inner.write().await;
        let result = f(&mut store);
        self.publish_kill_switch(store.kill_switch());
        result
    }

    pub async fn snapshot(&self) -> AppStore {
        self.inner.read().await.clone()
    }

    pub async fn persisted(&self) -> PersistedState {
        self.inner.read().await.persisted()
    }

    pub async fn kill_switch(&self) -> bool {
        self.inner.read().await.kill_switch()
    }

    /// Receiver that observes every kill-switch change.
    pub fn subscribe_kill_switch(&self) -> watch::Receiver<bool> {
        self.kill_switch_tx.subscribe()
    }

    fn publish_kill_switch(&self, active: bool) {
        self.kill_switch_tx.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
    }
}
