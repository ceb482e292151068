//! Review use case: human decisions on queued tasks.

use std::sync::Arc;

use guardian_core::error::Result;
use guardian_core::review::ReviewQuery;
use guardian_core::store::{Command, CommandOutcome};
use guardian_core::task::{ReviewDecision, Task};

use crate::store_service::StoreService;

pub struct ReviewUseCase {
    store: Arc<StoreService>,
}

impl ReviewUseCase {
    pub fn new(store: Arc<StoreService>) -> Self {
        Self { store }
    }

    pub async fn approve(&self, id: &str, new_text: Option<String>) -> Result<CommandOutcome> {
        self.decide(id, ReviewDecision::Approved, new_text).await
    }

    pub async fn reject(&self, id: &str) -> Result<CommandOutcome> {
        self.decide(id, ReviewDecision::Rejected, None).await
    }

    /// Records a decision and writes the decided task back to the backend.
    ///
    /// Denied, unknown and already-decided tasks leave the backend alone.
    pub async fn decide(
        &self,
        id: &str,
        decision: ReviewDecision,
        new_text: Option<String>,
    ) -> Result<CommandOutcome> {
        let outcome = self
            .store
            .execute(Command::UpdateTaskStatus {
                id: id.to_string(),
                decision,
                new_text,
            })
            .await?;

        if outcome.is_applied() {
            self.store.sync_task(id).await?;
        }
        Ok(outcome)
    }

    /// The queue as seen through `query`, plus the unfiltered total.
    pub async fn queue(&self, query: &ReviewQuery) -> (Vec<Task>, usize) {
        self.store
            .store()
            .read(|store| {
                let visible = query.apply(store.tasks()).into_iter().cloned().collect();
                (visible, store.tasks().len())
            })
            .await
    }
}
