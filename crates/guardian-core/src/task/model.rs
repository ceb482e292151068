//! Task domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Subscription tier a task is attributed to. Decides which queue it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tier {
    Standard,
    Enterprise,
}

/// Review status of a task.
///
/// `Pending` is the only non-terminal state. A task moves to `Approved` or
/// `Rejected` exactly once and never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

/// A reviewer's disposition of a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for TaskStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => TaskStatus::Approved,
            ReviewDecision::Rejected => TaskStatus::Rejected,
        }
    }
}

/// An AI-drafted output waiting for (or past) human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Client label, e.g. `"FinCorp (Enterprise)"`.
    pub client_id: String,
    pub tier: Tier,
    pub input: String,
    pub ai_draft: String,
    /// Model confidence, 0-100.
    pub confidence: u8,
    pub status: TaskStatus,
    pub risk_flag: bool,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Applies a review decision.
    ///
    /// Returns `false` without touching the task when it is already terminal.
    /// A non-empty `new_text` replaces the AI draft.
    pub fn decide(&mut self, decision: ReviewDecision, new_text: Option<&str>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = decision.into();
        if let Some(text) = new_text.filter(|t| !t.is_empty()) {
            self.ai_draft = text.to_string();
        }
        true
    }
}
