use chrono::Utc;

use super::{Command, CommandOutcome, Guard, PersistedState};
use crate::audit::{AuditLog, seed_audit_logs};
use crate::auth::{Role, issue_token};
use crate::rate_limit::{Queue, RateLimitPolicy, RateLimits};
use crate::session::{LoginGrant, Session, SubscriptionStatus};
use crate::stats::{SAVINGS_UNIT, Stats, StatsUpdate};
use crate::task::seed::seed_tasks;
use crate::task::{ReviewDecision, Task};
use crate::view::ActiveView;

/// Maximum number of tasks kept in the review queue. Oldest are evicted first.
pub const MAX_TASKS: usize = 100;

/// The application's state container.
///
/// Every mutation goes through [`AppStore::execute`], which runs the command
/// past [`Guard`] first. The named methods (`set_kill_switch`, ...) are thin
/// wrappers that build the matching [`Command`].
#[derive(Debug, Clone)]
pub struct AppStore {
    session: Session,
    active_view: ActiveView,
    tasks: Vec<Task>,
    audit_logs: Vec<AuditLog>,
    kill_switch: bool,
    has_completed_wizard: bool,
    stats: Stats,
    user_role: Role,
    rate_limits: RateLimits,
    rate_limit_policy: RateLimitPolicy,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    /// Creates a signed-out store with the seeded tasks and audit logs.
    pub fn new() -> Self {
        Self::with_tasks(seed_tasks(Utc::now()))
    }

    /// Creates a signed-out store with the given task queue.
    pub fn with_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.truncate(MAX_TASKS);
        Self {
            session: Session::default(),
            active_view: ActiveView::default(),
            tasks,
            audit_logs: seed_audit_logs(),
            kill_switch: false,
            has_completed_wizard: false,
            stats: Stats::default(),
            user_role: Role::default(),
            rate_limits: RateLimits::default(),
            rate_limit_policy: RateLimitPolicy::default(),
        }
    }

    /// Restores a store from persisted state plus a freshly fetched task queue.
    pub fn restore(state: PersistedState, tasks: Vec<Task>) -> Self {
        let mut store = Self::with_tasks(tasks);
        store.kill_switch = state.kill_switch;
        store.user_role = state.user_role;
        store.stats = state.stats;
        store.session = state.session;
        store.rate_limits = state.rate_limits;
        store.has_completed_wizard = state.has_completed_wizard;
        store
    }

    pub fn with_rate_limit_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit_policy = policy;
        self
    }

    /// The subset of fields that survives a restart.
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            kill_switch: self.kill_switch,
            user_role: self.user_role,
            stats: self.stats,
            session: self.session.clone(),
            rate_limits: self.rate_limits,
            has_completed_wizard: self.has_completed_wizard,
        }
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn audit_logs(&self) -> &[AuditLog] {
        &self.audit_logs
    }

    pub fn kill_switch(&self) -> bool {
        self.kill_switch
    }

    pub fn has_completed_wizard(&self) -> bool {
        self.has_completed_wizard
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn user_role(&self) -> Role {
        self.user_role
    }

    pub fn rate_limits(&self) -> &RateLimits {
        &self.rate_limits
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        self.rate_limit_policy
    }

    // ============================================================================
    // Command interpreter
    // ============================================================================

    /// Authorizes and applies `command`.
    ///
    /// A denied command is logged as a security violation and leaves the
    /// store untouched.
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        if let Err(denied) = Guard::authorize(self.user_role, &command) {
            tracing::error!(
                role = %self.user_role,
                command = command.name(),
                "SECURITY VIOLATION: unauthorized attempt to run {}",
                command.name()
            );
            return CommandOutcome::Denied(denied);
        }

        match command {
            Command::Login(grant) => self.apply_login(grant),
            Command::Logout => {
                self.session = Session::default();
                self.active_view = ActiveView::default();
                self.has_completed_wizard = false;
                tracing::info!("Session cleared");
                CommandOutcome::Applied
            }
            Command::SetRole(role) => self.apply_set_role(role),
            Command::SetKillSwitch(active) => {
                if self.kill_switch == active {
                    return CommandOutcome::Unchanged;
                }
                self.kill_switch = active;
                tracing::warn!(active, "Kill switch toggled");
                CommandOutcome::Applied
            }
            Command::SetRateLimit { queue, value } => {
                let stored = self.rate_limits.set(queue, value, self.rate_limit_policy);
                if stored != value {
                    tracing::warn!(
                        queue = %queue,
                        requested = value,
                        stored,
                        "Rate limit clamped to queue bounds"
                    );
                }
                CommandOutcome::Applied
            }
            Command::UpdateTaskStatus {
                id,
                decision,
                new_text,
            } => self.apply_task_decision(&id, decision, new_text.as_deref()),
            Command::AddTask(task) => {
                self.tasks.insert(0, task);
                self.tasks.truncate(MAX_TASKS);
                CommandOutcome::Applied
            }
            Command::UpdateStats(update) => {
                if update.is_empty() {
                    return CommandOutcome::Unchanged;
                }
                self.stats.merge(&update);
                CommandOutcome::Applied
            }
            Command::CompleteWizard => {
                self.has_completed_wizard = true;
                CommandOutcome::Applied
            }
            Command::SetActiveView(view) => {
                self.active_view = view;
                CommandOutcome::Applied
            }
            Command::ResetStats => {
                self.stats = Stats::default();
                CommandOutcome::Applied
            }
        }
    }

    fn apply_login(&mut self, grant: LoginGrant) -> CommandOutcome {
        let role = Role::Admin;
        let token = grant
            .access_token
            .unwrap_or_else(|| issue_token(role, grant.plan, Utc::now()));

        self.session = Session {
            is_authenticated: true,
            subscription_status: SubscriptionStatus::Active,
            plan: Some(grant.plan),
            email: grant.email,
            token: Some(token),
        };
        self.user_role = role;
        self.has_completed_wizard = false;

        tracing::info!(plan = %grant.plan, role = %role, "Session started");
        CommandOutcome::Applied
    }

    fn apply_set_role(&mut self, role: Role) -> CommandOutcome {
        if role != self.user_role {
            tracing::warn!(
                from = %self.user_role,
                to = %role,
                "Role changed without an authorization check"
            );
        }
        self.user_role = role;
        // Provider sessions keep the provider's token
        if self.session.email.is_none() {
            if let Some(plan) = self.session.plan {
                self.session.token = Some(issue_token(role, plan, Utc::now()));
            }
        }
        CommandOutcome::Applied
    }

    fn apply_task_decision(
        &mut self,
        id: &str,
        decision: ReviewDecision,
        new_text: Option<&str>,
    ) -> CommandOutcome {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(task_id = id, "Ignoring decision for unknown task");
            return CommandOutcome::Unchanged;
        };

        if !task.decide(decision, new_text) {
            tracing::debug!(task_id = id, status = %task.status, "Task already decided");
            return CommandOutcome::Unchanged;
        }

        let edited = new_text.is_some_and(|t| !t.is_empty());
        if decision == ReviewDecision::Approved && edited {
            self.stats.money_saved += SAVINGS_UNIT;
        }

        tracing::info!(task_id = id, decision = %decision, edited, "Task reviewed");
        CommandOutcome::Applied
    }

    // ============================================================================
    // Named operations
    // ============================================================================

    pub fn login(&mut self, grant: LoginGrant) -> CommandOutcome {
        self.execute(Command::Login(grant))
    }

    pub fn logout(&mut self) -> CommandOutcome {
        self.execute(Command::Logout)
    }

    pub fn set_role(&mut self, role: Role) -> CommandOutcome {
        self.execute(Command::SetRole(role))
    }

    pub fn set_kill_switch(&mut self, active: bool) -> CommandOutcome {
        self.execute(Command::SetKillSwitch(active))
    }

    pub fn set_rate_limit(&mut self, queue: Queue, value: u32) -> CommandOutcome {
        self.execute(Command::SetRateLimit { queue, value })
    }

    pub fn update_task_status(
        &mut self,
        id: impl Into<String>,
        decision: ReviewDecision,
        new_text: Option<String>,
    ) -> CommandOutcome {
        self.execute(Command::UpdateTaskStatus {
            id: id.into(),
            decision,
            new_text,
        })
    }

    pub fn add_task(&mut self, task: Task) -> CommandOutcome {
        self.execute(Command::AddTask(task))
    }

    pub fn update_stats(&mut self, update: StatsUpdate) -> CommandOutcome {
        self.execute(Command::UpdateStats(update))
    }

    pub fn complete_wizard(&mut self) -> CommandOutcome {
        self.execute(Command::CompleteWizard)
    }

    pub fn set_active_view(&mut self, view: ActiveView) -> CommandOutcome {
        self.execute(Command::SetActiveView(view))
    }

    pub fn reset_stats(&mut self) -> CommandOutcome {
        self.execute(Command::ResetStats)
    }

    /// Mirrors a kill-switch value saved by another session.
    ///
    /// Skips the role guard: the toggle was already authorized where it was made.
    pub fn adopt_kill_switch(&mut self, active: bool) -> CommandOutcome {
        if self.kill_switch == active {
            return CommandOutcome::Unchanged;
        }
        self.kill_switch = active;
        tracing::warn!(active, "Kill switch changed by another session");
        CommandOutcome::Applied
    }
}
