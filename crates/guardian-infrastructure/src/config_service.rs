//! Loads `config.toml`, creating it with defaults on first run.

use std::path::Path;

use guardian_core::config::GuardianConfig;
use guardian_core::error::Result;

use crate::paths::GuardianPaths;
use crate::storage::AtomicFile;

pub struct ConfigService {
    file: AtomicFile<GuardianConfig>,
}

impl ConfigService {
    pub fn new(base_dir: Option<&Path>) -> Result<Self> {
        let path = GuardianPaths::new(base_dir).config_file()?;
        Ok(Self {
            file: AtomicFile::toml(path),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration. Missing keys take their default values.
    pub fn load(&self) -> Result<GuardianConfig> {
        let config = self.file.load_or_create(GuardianConfig::default())?;
        tracing::debug!(path = %self.file.path().display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save(&self, config: &GuardianConfig) -> Result<()> {
        self.file.save(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_core::rate_limit::RateLimitPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_creates_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(Some(temp_dir.path())).unwrap();

        let config = service.load().unwrap();

        assert_eq!(config, GuardianConfig::default());
        assert!(temp_dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "[rate_limits]\npolicy = \"unconstrained\"\n",
        )
        .unwrap();
        let service = ConfigService::new(Some(temp_dir.path())).unwrap();

        let config = service.load().unwrap();

        assert_eq!(config.rate_limits.policy, RateLimitPolicy::Unconstrained);
        assert_eq!(config.simulation.stats_interval_ms, 3000);
    }
}
