//! Review queue filtering and ordering.
//!
//! A [`ReviewQuery`] filters a task slice by tier, status and risk, then
//! orders what is left. The query never copies tasks; it returns borrows into
//! the store's list.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::task::{Task, TaskStatus, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TierFilter {
    #[default]
    All,
    Standard,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskFilter {
    #[default]
    All,
    Risky,
    Safe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    ConfidenceAsc,
    ConfidenceDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewQuery {
    pub tier: TierFilter,
    pub status: StatusFilter,
    pub risk: RiskFilter,
    pub sort: SortOrder,
}

impl ReviewQuery {
    fn matches(&self, task: &Task) -> bool {
        let tier_ok = match self.tier {
            TierFilter::All => true,
            TierFilter::Standard => task.tier == Tier::Standard,
            TierFilter::Enterprise => task.tier == Tier::Enterprise,
        };
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => task.status == TaskStatus::Pending,
            StatusFilter::Approved => task.status == TaskStatus::Approved,
            StatusFilter::Rejected => task.status == TaskStatus::Rejected,
        };
        let risk_ok = match self.risk {
            RiskFilter::All => true,
            RiskFilter::Risky => task.risk_flag,
            RiskFilter::Safe => !task.risk_flag,
        };
        tier_ok && status_ok && risk_ok
    }

    /// Filters then sorts `tasks`.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let mut visible: Vec<&Task> = tasks.iter().filter(|t| self.matches(t)).collect();

        match self.sort {
            SortOrder::Newest => visible.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Oldest => visible.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortOrder::ConfidenceAsc => visible.sort_by_key(|t| t.confidence),
            SortOrder::ConfidenceDesc => visible.sort_by(|a, b| b.confidence.cmp(&a.confidence)),
        }

        visible
    }

    /// Whether to show the "upgrade to priority" banner for `visible` tasks.
    ///
    /// True when a pending standard-tier task is on screen, unless the reviewer
    /// is only looking at approved work.
    pub fn shows_priority_upsell(&self, visible: &[&Task]) -> bool {
        self.status != StatusFilter::Approved
            && visible
                .iter()
                .any(|t| t.tier == Tier::Standard && t.is_pending())
    }
}
