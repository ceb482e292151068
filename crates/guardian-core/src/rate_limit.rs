//! Per-queue throughput limits.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Processing queue a rate limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Queue {
    /// Priority queue used by enterprise traffic.
    Vip,
    Standard,
}

impl Queue {
    /// Accepted range in requests per second.
    pub fn bounds(self) -> RangeInclusive<u32> {
        match self {
            Queue::Vip => 0..=200,
            Queue::Standard => 0..=50,
        }
    }
}

/// What the store does with a value outside [`Queue::bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitPolicy {
    /// Clamp into the queue's bounds.
    #[default]
    Clamp,
    /// Store the value as given.
    Unconstrained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    pub vip: u32,
    pub standard: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            vip: 80,
            standard: 20,
        }
    }
}

impl RateLimits {
    pub fn get(&self, queue: Queue) -> u32 {
        match queue {
            Queue::Vip => self.vip,
            Queue::Standard => self.standard,
        }
    }

    /// Sets `queue` to `value` under `policy` and returns the stored value.
    pub fn set(&mut self, queue: Queue, value: u32, policy: RateLimitPolicy) -> u32 {
        let stored = match policy {
            RateLimitPolicy::Clamp => {
                let bounds = queue.bounds();
                value.clamp(*bounds.start(), *bounds.end())
            }
            RateLimitPolicy::Unconstrained => value,
        };
        match queue {
            Queue::Vip => self.vip = stored,
            Queue::Standard => self.standard = stored,
        }
        stored
    }
}
