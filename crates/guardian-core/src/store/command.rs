//! Store commands.

use crate::auth::Role;
use crate::rate_limit::Queue;
use crate::session::LoginGrant;
use crate::stats::StatsUpdate;
use crate::task::{ReviewDecision, Task};
use crate::view::ActiveView;

use super::AccessDenied;

/// A single mutation of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login(LoginGrant),
    Logout,
    /// Demo role impersonation. Not gated.
    SetRole(Role),
    SetKillSwitch(bool),
    SetRateLimit { queue: Queue, value: u32 },
    UpdateTaskStatus {
        id: String,
        decision: ReviewDecision,
        new_text: Option<String>,
    },
    AddTask(Task),
    UpdateStats(StatsUpdate),
    CompleteWizard,
    SetActiveView(ActiveView),
    ResetStats,
}

impl Command {
    /// Stable name used in logs and access-denied errors.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login(_) => "login",
            Command::Logout => "logout",
            Command::SetRole(_) => "set_role",
            Command::SetKillSwitch(_) => "set_kill_switch",
            Command::SetRateLimit { .. } => "set_rate_limit",
            Command::UpdateTaskStatus { .. } => "update_task_status",
            Command::AddTask(_) => "add_task",
            Command::UpdateStats(_) => "update_stats",
            Command::CompleteWizard => "complete_wizard",
            Command::SetActiveView(_) => "set_active_view",
            Command::ResetStats => "reset_stats",
        }
    }

    /// Role required to run this command, or `None` when anyone may.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Command::SetKillSwitch(_)
            | Command::SetRateLimit { .. }
            | Command::UpdateTaskStatus { .. } => Some(Role::Admin),
            Command::Login(_)
            | Command::Logout
            | Command::SetRole(_)
            | Command::AddTask(_)
            | Command::UpdateStats(_)
            | Command::CompleteWizard
            | Command::SetActiveView(_)
            | Command::ResetStats => None,
        }
    }
}

/// What executing a command did.
///
/// Denied commands leave the store untouched and are not errors: callers may
/// ignore the outcome entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// Allowed, but nothing changed (unknown task, terminal task, same value).
    Unchanged,
    Denied(AccessDenied),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, CommandOutcome::Denied(_))
    }
}
