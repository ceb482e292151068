//! Periodic simulation driver.
//!
//! Two independent timers feed an [`EventSource`] into the store. While the
//! kill switch is engaged both timers are dropped; they are rebuilt from
//! scratch once it clears. The saved switch is re-read on every tick and while
//! halted, so a toggle from another process takes effect too. Cancellation
//! stops the driver at the next await.

use std::sync::Arc;
use std::time::Duration;

use guardian_application::StoreService;
use guardian_core::config::SimulationSettings;
use guardian_core::simulation::{EventSource, TickKind};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Counters collected over one driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub stats_ticks: u64,
    pub task_ticks: u64,
    pub events_applied: u64,
    pub halts: u64,
}

pub struct SimulationDriver<S> {
    store: Arc<StoreService>,
    source: S,
    stats_period: Duration,
    task_period: Duration,
}

impl<S: EventSource> SimulationDriver<S> {
    pub fn new(store: Arc<StoreService>, source: S, settings: &SimulationSettings) -> Self {
        Self {
            store,
            source,
            stats_period: Duration::from_millis(settings.stats_interval_ms.max(1)),
            task_period: Duration::from_millis(settings.task_interval_ms.max(1)),
        }
    }

    /// Runs until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) -> DriverReport {
        let mut report = DriverReport::default();
        let mut kill_switch = self.store.store().subscribe_kill_switch();

        tracing::info!(
            stats_ms = self.stats_period.as_millis() as u64,
            task_ms = self.task_period.as_millis() as u64,
            "[Simulation] Driver started"
        );

        'outer: loop {
            // Halted: no timers exist until the switch clears
            if *kill_switch.borrow_and_update() {
                report.halts += 1;
                tracing::warn!("[Simulation] Kill switch engaged, timers stopped");
                while *kill_switch.borrow_and_update() {
                    tokio::select! {
                        _ = cancel.cancelled() => break 'outer,
                        changed = kill_switch.changed() => {
                            if changed.is_err() {
                                break 'outer;
                            }
                        }
                        // Another process may release the switch
                        _ = tokio::time::sleep(self.stats_period) => self.poll_kill_switch().await,
                    }
                }
            }

            let now = Instant::now();
            let mut stats_timer = interval_at(now + self.stats_period, self.stats_period);
            let mut task_timer = interval_at(now + self.task_period, self.task_period);
            stats_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            task_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break 'outer,
                    changed = kill_switch.changed() => {
                        if changed.is_err() {
                            break 'outer;
                        }
                        if *kill_switch.borrow() {
                            // Drop both timers together
                            continue 'outer;
                        }
                    }
                    _ = stats_timer.tick() => {
                        report.stats_ticks += 1;
                        self.tick(TickKind::Stats, &mut report).await;
                    }
                    _ = task_timer.tick() => {
                        report.task_ticks += 1;
                        self.tick(TickKind::Task, &mut report).await;
                    }
                }
            }
        }

        tracing::info!(
            stats_ticks = report.stats_ticks,
            task_ticks = report.task_ticks,
            events = report.events_applied,
            "[Simulation] Driver stopped"
        );
        report
    }

    async fn poll_kill_switch(&self) {
        if let Err(e) = self.store.refresh_kill_switch().await {
            tracing::warn!(error = %e, "Failed to re-read the kill switch");
        }
    }

    async fn tick(&mut self, kind: TickKind, report: &mut DriverReport) {
        let Some(event) = self.source.next_event(kind) else {
            return;
        };
        match self.store.apply_simulation_event(event).await {
            Ok(outcome) if outcome.is_applied() => report.events_applied += 1,
            Ok(_) => tracing::debug!(tick = %kind, "Simulation event dropped"),
            Err(e) => tracing::warn!(tick = %kind, error = %e, "Failed to persist simulation event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use guardian_core::error::Result;
    use guardian_core::rate_limit::RateLimitPolicy;
    use guardian_core::session::{LoginGrant, Plan};
    use guardian_core::simulation::{ScriptedEventSource, SimulationEvent};
    use guardian_core::store::{Command, PersistedState, StateRepository};
    use guardian_core::task::{Task, TaskRepository, TaskStatus, Tier};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct NullState(Mutex<PersistedState>);

    #[async_trait]
    impl StateRepository for NullState {
        async fn get_state(&self) -> Result<PersistedState> {
            Ok(self.0.lock().await.clone())
        }
        async fn save_state(&self, state: PersistedState) -> Result<()> {
            *self.0.lock().await = state;
            Ok(())
        }
    }

    #[derive(Default)]
    struct NullTasks(Mutex<Vec<Task>>);

    #[async_trait]
    impl TaskRepository for NullTasks {
        async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
            Ok(self.0.lock().await.iter().find(|t| t.id == id).cloned())
        }
        async fn save(&self, task: &Task) -> Result<()> {
            self.0.lock().await.push(task.clone());
            Ok(())
        }
        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }
        async fn list_all(&self) -> Result<Vec<Task>> {
            Ok(self.0.lock().await.clone())
        }
    }

    fn settings() -> SimulationSettings {
        SimulationSettings {
            stats_interval_ms: 3000,
            task_interval_ms: 4000,
        }
    }

    fn risky_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            client_id: "AutoSys (Standard)".to_string(),
            tier: Tier::Standard,
            input: "Generate a SQL query for the user database.".to_string(),
            ai_draft: "SELECT * FROM users WHERE active = 1...".to_string(),
            confidence: 64,
            status: TaskStatus::Pending,
            risk_flag: true,
            timestamp: Utc::now(),
        }
    }

    async fn service() -> Arc<StoreService> {
        let service = StoreService::load(
            Arc::new(NullState::default()),
            Arc::new(NullTasks::default()),
            RateLimitPolicy::Clamp,
        )
        .await
        .unwrap();
        service
            .execute(Command::Login(LoginGrant::for_plan(Plan::Enterprise)))
            .await
            .unwrap();
        Arc::new(service)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_drive_scripted_events() {
        let store = service().await;
        let before = store.store().read(|s| *s.stats()).await;

        let mut source = ScriptedEventSource::new();
        for _ in 0..3 {
            source.push(
                TickKind::Stats,
                Some(SimulationEvent::StatsDrift { runs: 1, money: 15 }),
            );
        }
        source.push(TickKind::Task, Some(SimulationEvent::TaskArrived(risky_task("live-a"))));
        source.push(TickKind::Task, None);

        let cancel = CancellationToken::new();
        let driver = SimulationDriver::new(store.clone(), source, &settings());
        let handle = tokio::spawn(driver.run(cancel.clone()));

        // Stats fire at 3s, 6s, 9s; tasks at 4s, 8s
        tokio::time::sleep(Duration::from_millis(9_500)).await;
        cancel.cancel();
        let report = handle.await.unwrap();

        assert_eq!(report.stats_ticks, 3);
        assert_eq!(report.task_ticks, 2);
        assert_eq!(report.events_applied, 4);

        let after = store.store().read(|s| *s.stats()).await;
        assert_eq!(after.total_runs, before.total_runs + 3);
        assert_eq!(after.money_saved, before.money_saved + 45);
        assert_eq!(after.risks_caught, before.risks_caught + 1);
        assert_eq!(store.store().read(|s| s.tasks()[0].id.clone()).await, "live-a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_switch_halts_and_resumes() {
        let store = service().await;
        let before = store.store().read(|s| s.stats().total_runs).await;

        let mut source = ScriptedEventSource::new();
        for _ in 0..10 {
            source.push(
                TickKind::Stats,
                Some(SimulationEvent::StatsDrift { runs: 1, money: 0 }),
            );
        }

        let cancel = CancellationToken::new();
        let driver = SimulationDriver::new(store.clone(), source, &settings());
        let handle = tokio::spawn(driver.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(store.store().read(|s| s.stats().total_runs).await, before + 1);

        store.execute(Command::SetKillSwitch(true)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert_eq!(
            store.store().read(|s| s.stats().total_runs).await,
            before + 1,
            "no events while halted"
        );

        store.execute(Command::SetKillSwitch(false)).await.unwrap();
        // Timers restart from zero after the switch clears
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(store.store().read(|s| s.stats().total_runs).await, before + 2);

        cancel.cancel();
        let report = handle.await.unwrap();
        assert_eq!(report.halts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_halted_when_switch_already_on() {
        let store = service().await;
        store.execute(Command::SetKillSwitch(true)).await.unwrap();

        let cancel = CancellationToken::new();
        let driver = SimulationDriver::new(store.clone(), ScriptedEventSource::new(), &settings());
        let handle = tokio::spawn(driver.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        cancel.cancel();
        let report = handle.await.unwrap();

        assert_eq!(report.stats_ticks, 0);
        assert_eq!(report.task_ticks, 0);
        assert_eq!(report.halts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_switch_from_another_process_halts_and_resumes() {
        let state = Arc::new(NullState::default());
        let store = Arc::new(
            StoreService::load(
                state.clone(),
                Arc::new(NullTasks::default()),
                RateLimitPolicy::Clamp,
            )
            .await
            .unwrap(),
        );
        store
            .execute(Command::Login(LoginGrant::for_plan(Plan::Enterprise)))
            .await
            .unwrap();
        let before = store.store().read(|s| s.stats().total_runs).await;

        let mut source = ScriptedEventSource::new();
        for _ in 0..10 {
            source.push(
                TickKind::Stats,
                Some(SimulationEvent::StatsDrift { runs: 1, money: 0 }),
            );
        }

        let cancel = CancellationToken::new();
        let driver = SimulationDriver::new(store.clone(), source, &settings());
        let handle = tokio::spawn(driver.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(store.store().read(|s| s.stats().total_runs).await, before + 1);

        // A second invocation sharing the same saved state
        let other = StoreService::load(
            state.clone(),
            Arc::new(NullTasks::default()),
            RateLimitPolicy::Clamp,
        )
        .await
        .unwrap();
        other.execute(Command::SetKillSwitch(true)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert!(store.store().kill_switch().await);
        assert_eq!(store.store().read(|s| s.stats().total_runs).await, before + 1);
        assert!(state.0.lock().await.kill_switch);

        other.execute(Command::SetKillSwitch(false)).await.unwrap();
        // Picked up by the next poll at 36s, then the stats timer fires at 39s
        tokio::time::sleep(Duration::from_millis(7_000)).await;
        assert!(!store.store().kill_switch().await);
        assert_eq!(store.store().read(|s| s.stats().total_runs).await, before + 2);

        cancel.cancel();
        let report = handle.await.unwrap();
        assert_eq!(report.halts, 1);
    }
}
