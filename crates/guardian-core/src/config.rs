//! Configuration models.
//!
//! `GuardianConfig` lives in `config.toml`; API keys live separately in
//! `secret.json` as `SecretConfig`.

use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimitPolicy;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianConfig {
    pub simulation: SimulationSettings,
    pub rate_limits: RateLimitSettings,
    pub identity: IdentitySettings,
    pub backend: BackendSettings,
    pub gemini: GeminiSettings,
    pub logging: LoggingSettings,
}

/// Timer periods of the simulation driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub stats_interval_ms: u64,
    pub task_interval_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            stats_interval_ms: 3000,
            task_interval_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub policy: RateLimitPolicy,
}

/// Identity provider endpoint. `None` selects the in-process demo provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub base_url: Option<String>,
}

/// Task backend endpoint. `None` keeps tasks on the local filesystem.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Also write a daily log file under `<config>/logs/`.
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: false,
        }
    }
}

/// API keys. Never logged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub api_key: String,
}
