//! State repository trait.

use async_trait::async_trait;

use super::PersistedState;
use crate::error::Result;

/// Repository for the persisted subset of the store.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Loads the latest saved state, or the defaults when nothing was saved yet.
    async fn get_state(&self) -> Result<PersistedState>;

    /// Saves the fields of `state` changed since this handle last loaded or
    /// saved. Fields written meanwhile by another handle are kept.
    async fn save_state(&self, state: PersistedState) -> Result<()>;
}
