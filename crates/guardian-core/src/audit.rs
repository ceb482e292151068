//! Ghost audit log.
//!
//! Immutable records of risks that were detected and resolved in shadow mode.
//! The list is append-only and pre-seeded; nothing edits a record after it is
//! created.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub task_snippet: String,
    pub risk_detected: String,
    pub outcome: String,
    /// Estimated liability avoided, in dollars.
    pub saved_liability: u64,
}

impl AuditLog {
    fn seeded(
        id: &str,
        date: &str,
        task_snippet: &str,
        risk_detected: &str,
        outcome: &str,
        saved_liability: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            date: date.to_string(),
            task_snippet: task_snippet.to_string(),
            risk_detected: risk_detected.to_string(),
            outcome: outcome.to_string(),
            saved_liability,
        }
    }
}

/// The four records every session starts with.
pub fn seed_audit_logs() -> Vec<AuditLog> {
    vec![
        AuditLog::seeded("l-1", "2025-12-10", "Refund Policy Update...", "Incorrect Legal Term", "Fixed by AI", 1200),
        AuditLog::seeded("l-2", "2025-12-11", "Customer Email: Angry...", "Toxic Tone", "Fixed by AI", 500),
        AuditLog::seeded("l-3", "2025-12-11", "Financial Disclosure...", "Missing Compliance", "Fixed by AI", 5000),
        AuditLog::seeded("l-4", "2025-12-12", "Competitor Analysis...", "Hallucinated Data", "Flagged for Human", 250),
    ]
}

/// Sum of `saved_liability` across `logs`.
pub fn total_saved_liability(logs: &[AuditLog]) -> u64 {
    logs.iter().map(|log| log.saved_liability).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_totals() {
        let logs = seed_audit_logs();
        assert_eq!(logs.len(), 4);
        assert_eq!(total_saved_liability(&logs), 6950);
    }
}
