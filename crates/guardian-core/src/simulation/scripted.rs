use std::collections::VecDeque;

use super::{EventSource, SimulationEvent, TickKind};

/// Deterministic event source that replays queued events per tick kind.
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    stats: VecDeque<Option<SimulationEvent>>,
    tasks: VecDeque<Option<SimulationEvent>>,
}

impl ScriptedEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next tick of `kind`. `None` scripts a quiet tick.
    pub fn push(&mut self, kind: TickKind, event: Option<SimulationEvent>) -> &mut Self {
        match kind {
            TickKind::Stats => self.stats.push_back(event),
            TickKind::Task => self.tasks.push_back(event),
        }
        self
    }

    pub fn remaining(&self) -> usize {
        self.stats.len() + self.tasks.len()
    }
}

impl EventSource for ScriptedEventSource {
    fn next_event(&mut self, tick: TickKind) -> Option<SimulationEvent> {
        let queue = match tick {
            TickKind::Stats => &mut self.stats,
            TickKind::Task => &mut self.tasks,
        };
        queue.pop_front().flatten()
    }
}
