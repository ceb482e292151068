use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::rate_limit::RateLimits;
use crate::session::Session;
use crate::stats::Stats;

/// Durable key (file stem) the persisted state is stored under.
pub const STORAGE_KEY: &str = "guardian-storage";

/// The subset of store fields that survives a restart.
///
/// Tasks and audit logs are deliberately absent: they are re-fetched or
/// re-seeded on every start.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub kill_switch: bool,
    pub user_role: Role,
    pub stats: Stats,
    pub session: Session,
    pub rate_limits: RateLimits,
    pub has_completed_wizard: bool,
}

impl PersistedState {
    /// Copies into `self` every field that differs between `base` and `current`.
    ///
    /// `self` is the latest saved state; fields this session left alone keep
    /// whatever another session wrote.
    pub fn merge_changes(&mut self, base: &PersistedState, current: &PersistedState) {
        if base.kill_switch != current.kill_switch {
            self.kill_switch = current.kill_switch;
        }
        if base.user_role != current.user_role {
            self.user_role = current.user_role;
        }
        if base.stats != current.stats {
            self.stats = current.stats;
        }
        if base.session != current.session {
            self.session = current.session.clone();
        }
        if base.rate_limits != current.rate_limits {
            self.rate_limits = current.rate_limits;
        }
        if base.has_completed_wizard != current.has_completed_wizard {
            self.has_completed_wizard = current.has_completed_wizard;
        }
    }
}
