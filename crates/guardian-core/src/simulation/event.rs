use strum::Display;

use crate::stats::StatsUpdate;
use crate::store::{AppStore, Command, CommandOutcome};
use crate::task::Task;

/// Which timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TickKind {
    Stats,
    Task,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// Counters drift upward. Both values are increments.
    StatsDrift { runs: u64, money: u64 },
    /// A new task reached the review queue.
    TaskArrived(Task),
}

/// Produces simulated events on timer ticks.
pub trait EventSource: Send {
    /// Returns the event for this tick, or `None` when nothing happens.
    fn next_event(&mut self, tick: TickKind) -> Option<SimulationEvent>;
}

/// Applies a simulation event to the store through ungated commands.
pub fn apply_event(store: &mut AppStore, event: SimulationEvent) -> CommandOutcome {
    match event {
        SimulationEvent::StatsDrift { runs, money } => {
            let stats = *store.stats();
            store.update_stats(StatsUpdate {
                total_runs: Some(stats.total_runs + runs),
                money_saved: Some(stats.money_saved + money),
                ..StatsUpdate::default()
            })
        }
        SimulationEvent::TaskArrived(task) => {
            let risky = task.risk_flag;
            tracing::debug!(task_id = %task.id, risky, "Simulated task arrived");
            let outcome = store.add_task(task);
            if risky && outcome.is_applied() {
                let risks_caught = store.stats().risks_caught + 1;
                store.update_stats(StatsUpdate {
                    risks_caught: Some(risks_caught),
                    ..StatsUpdate::default()
                });
            }
            outcome
        }
    }
}
