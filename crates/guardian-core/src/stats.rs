//! Aggregate dashboard counters.
//!
//! These are a cosmetic projection adjusted by simulation ticks and approvals.
//! They are never reconciled against the task or audit lists.

use serde::{Deserialize, Serialize};

/// Amount added to `money_saved` when a reviewer approves a task with an edit.
pub const SAVINGS_UNIT: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_runs: u64,
    pub risks_caught: u64,
    pub money_saved: u64,
    pub active_workers: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total_runs: 1240,
            risks_caught: 42,
            money_saved: 18600,
            active_workers: 12,
        }
    }
}

impl Stats {
    /// Merges the fields present in `update`.
    pub fn merge(&mut self, update: &StatsUpdate) {
        if let Some(total_runs) = update.total_runs {
            self.total_runs = total_runs;
        }
        if let Some(risks_caught) = update.risks_caught {
            self.risks_caught = risks_caught;
        }
        if let Some(money_saved) = update.money_saved {
            self.money_saved = money_saved;
        }
        if let Some(active_workers) = update.active_workers {
            self.active_workers = active_workers;
        }
    }
}

/// Partial stats; absent fields are left as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_runs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks_caught: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money_saved: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_workers: Option<u32>,
}

impl StatsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut stats = Stats::default();
        stats.merge(&StatsUpdate {
            money_saved: Some(20_000),
            ..StatsUpdate::default()
        });

        assert_eq!(stats.money_saved, 20_000);
        assert_eq!(stats.total_runs, 1240);
        assert_eq!(stats.risks_caught, 42);
        assert_eq!(stats.active_workers, 12);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut stats = Stats::default();
        let update = StatsUpdate::default();
        assert!(update.is_empty());
        stats.merge(&update);
        assert_eq!(stats, Stats::default());
    }
}
