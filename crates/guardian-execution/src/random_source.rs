//! Randomized activity: counter drift and occasional live tasks.

use chrono::Utc;
use guardian_core::simulation::{EventSource, SimulationEvent, TickKind};
use guardian_core::task::{Task, TaskStatus, Tier};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CLIENTS: [&str; 5] = ["FinCorp", "LegalEagle", "RetailGiant", "AutoSys", "MediCare_Plus"];

/// Paired request and AI draft; a live task always uses a matching pair.
const SAMPLES: [(&str, &str); 5] = [
    (
        "Check this outgoing email for PII violations.",
        "Here is the analysis. No PII detected in the header...",
    ),
    (
        "Summarize the quarterly earnings call.",
        "Revenue is up 12% YoY. Growth is strong...",
    ),
    (
        "Generate a SQL query for the user database.",
        "SELECT * FROM users WHERE active = 1...",
    ),
    (
        "Draft a termination notice for vendor X.",
        "We regret to inform you that we are ending...",
    ),
    (
        "Translate this contract to Spanish.",
        "Este contrato establece los términos...",
    ),
];

const MONEY_DRIFT: u64 = 15;
const MONEY_DRIFT_CHANCE: f64 = 0.3;
const TASK_CHANCE: f64 = 0.4;
const ENTERPRISE_CHANCE: f64 = 0.4;
const RISK_CHANCE: f64 = 0.25;

/// [`EventSource`] driven by a random number generator.
pub struct RandomEventSource<R = StdRng> {
    rng: R,
}

impl RandomEventSource<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible source for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEventSource<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomEventSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    fn stats_drift(&mut self) -> SimulationEvent {
        let runs = self.rng.gen_range(0..=1);
        let money = if self.rng.gen_bool(MONEY_DRIFT_CHANCE) {
            MONEY_DRIFT
        } else {
            0
        };
        SimulationEvent::StatsDrift { runs, money }
    }

    /// A fresh pending task with a random client, sample and risk flag.
    pub fn live_task(&mut self) -> Task {
        let enterprise = self.rng.gen_bool(ENTERPRISE_CHANCE);
        let risky = self.rng.gen_bool(RISK_CHANCE);
        let (input, draft) = SAMPLES[self.rng.gen_range(0..SAMPLES.len())];
        let client = CLIENTS[self.rng.gen_range(0..CLIENTS.len())];
        let now = Utc::now();

        let (tier, label) = if enterprise {
            (Tier::Enterprise, "Enterprise")
        } else {
            (Tier::Standard, "Standard")
        };

        Task {
            id: format!(
                "live-{}-{}",
                now.timestamp_millis(),
                self.rng.gen_range(0..1000)
            ),
            client_id: format!("{client} ({label})"),
            tier,
            input: input.to_string(),
            ai_draft: draft.to_string(),
            confidence: self.rng.gen_range(60..=98),
            status: TaskStatus::Pending,
            risk_flag: risky,
            timestamp: now,
        }
    }
}

impl<R: Rng + Send> EventSource for RandomEventSource<R> {
    fn next_event(&mut self, tick: TickKind) -> Option<SimulationEvent> {
        match tick {
            TickKind::Stats => Some(self.stats_drift()),
            TickKind::Task => self
                .rng
                .gen_bool(TASK_CHANCE)
                .then(|| SimulationEvent::TaskArrived(self.live_task())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_drift_stays_in_range() {
        let mut source = RandomEventSource::seeded(7);
        for _ in 0..200 {
            match source.next_event(TickKind::Stats) {
                Some(SimulationEvent::StatsDrift { runs, money }) => {
                    assert!(runs <= 1);
                    assert!(money == 0 || money == MONEY_DRIFT);
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[test]
    fn test_live_tasks_are_well_formed() {
        let mut source = RandomEventSource::seeded(42);
        for _ in 0..200 {
            let task = source.live_task();
            assert!(task.id.starts_with("live-"));
            assert!((60..=98).contains(&task.confidence));
            assert!(task.is_pending());
            assert!(SAMPLES.contains(&(task.input.as_str(), task.ai_draft.as_str())));
            let suffix = match task.tier {
                Tier::Enterprise => "(Enterprise)",
                Tier::Standard => "(Standard)",
            };
            assert!(task.client_id.ends_with(suffix));
        }
    }

    #[test]
    fn test_task_tick_is_sometimes_quiet() {
        let mut source = RandomEventSource::seeded(3);
        let arrivals = (0..500)
            .filter(|_| source.next_event(TickKind::Task).is_some())
            .count();
        // 40% nominal rate
        assert!((120..=280).contains(&arrivals), "arrivals = {arrivals}");
    }
}
